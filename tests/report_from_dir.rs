//! Report generation over a directory of dump files.

use cql_loadtest::{write_csv, write_statements, GenerateOptions};
use cql_schema::{SchemaConfig, SchemaProcessor};
use std::fs;

const SHOP: &str = r#"
CREATE KEYSPACE shop WITH replication = {'class': 'SimpleStrategy', 'replication_factor': '1'};
CREATE TYPE shop.addr (city text, zip int);
CREATE TABLE shop.customers (id uuid PRIMARY KEY, home frozen<addr>);
"#;

const BILLING: &str = r#"
CREATE TABLE billing.invoices (id uuid, line int, amount decimal, PRIMARY KEY (id, line));
CREATE TABLE system.peers (peer inet PRIMARY KEY, data_center text);
"#;

#[tokio::test]
async fn report_covers_every_file_in_path_order() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("b_shop.cql"), SHOP).unwrap();
    fs::write(dir.path().join("a_billing.cql"), BILLING).unwrap();

    let processed = SchemaProcessor::default()
        .process_dir(dir.path())
        .await
        .unwrap();
    assert_eq!(processed.len(), 2);
    assert!(processed[0].0.ends_with("a_billing.cql"));

    let out_path = dir.path().join("out").join("report.csv");
    fs::create_dir_all(out_path.parent().unwrap()).unwrap();
    let file = fs::File::create(&out_path).unwrap();
    let rows = write_csv(processed.iter().flat_map(|(_, s)| &s.objects), file).unwrap();
    assert_eq!(rows, 4);

    let report = fs::read_to_string(&out_path).unwrap();
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(
        lines,
        vec![
            "objtype,keyspace,name,size,WRUPerRec,rowsPerWRU,rowsPerRRU,rowsSizeWarning,columns",
            "TABLE,BILLING,INVOICES,28,1,35,142,false,3",
            "KEYSPACE,SHOP,,,,,,,",
            "TYPE,SHOP,ADDR,204,1,4,19,false,2",
            "TABLE,SHOP,CUSTOMERS,220,1,4,18,false,2",
        ]
    );
}

#[tokio::test]
async fn generate_writes_a_statement_file() {
    let dir = tempfile::tempdir().unwrap();
    let schema_path = dir.path().join("shop.cql");
    fs::write(&schema_path, SHOP).unwrap();

    let config = SchemaConfig::default().with_target_keyspace("lt");
    let processed = SchemaProcessor::new(config.clone())
        .process_file(&schema_path)
        .await
        .unwrap();

    let options = GenerateOptions {
        row_count: 10,
        seed: 1,
        tables: Vec::new(),
        create: true,
    };
    let out_path = dir.path().join("shop_out.cql");
    let summary =
        write_statements(&processed, &config, &options, fs::File::create(&out_path).unwrap())
            .unwrap();
    assert_eq!(summary.records_written, 10);
    assert_eq!(summary.records_failed, 0);

    let statements = fs::read_to_string(&out_path).unwrap();
    assert_eq!(statements.lines().count(), 2 + 10);
    assert!(statements
        .lines()
        .skip(2)
        .all(|l| l.starts_with("INSERT INTO lt.SHOP_CUSTOMERS (ID,HOME) VALUES (")
            && l.contains("{ CITY : '")));
}
