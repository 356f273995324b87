//! Integration tests for the markdown doc writer.

use tiered_config::{ConfigDoc, ConfigOptions, DocOptions, KeyOptions, LINE_ENDING, write_doc};

fn join_as_lines(lines: &[&str]) -> String {
    lines.join(LINE_ENDING)
}

fn table_headers() -> [(&'static str, &'static str); 4] {
    [
        ("env", "env variable"),
        ("description", "description"),
        ("type", "type"),
        ("presence", "presence"),
    ]
}

#[test]
fn test_configuration_doc_written() {
    let options = DocOptions::new(table_headers())
        .with_placeholder("-")
        .with_config(
            ConfigDoc::new("server")
                .with_key(
                    "host",
                    [
                        ("env", "SERVER_HOST"),
                        ("description", "server host"),
                        ("type", "string"),
                    ],
                )
                .with_key(
                    "port",
                    [
                        ("env", "SERVER_HOST"),
                        ("description", "server port"),
                        ("type", "integer"),
                    ],
                ),
        )
        .with_config(
            ConfigDoc::new("db")
                .with_description("database connection config")
                .with_key("host", [("env", "DB_HOST"), ("description", "db server host")])
                .with_key("port", [("env", "DB_PORT"), ("description", "db server port")]),
        );

    let expected = join_as_lines(&[
        "## Configuration",
        "### server",
        "|key|env variable|description|type|presence|",
        "|-|-|-|-|-|",
        "|host|SERVER_HOST|server host|string|-|",
        "|port|SERVER_HOST|server port|integer|-|",
        "### db - database connection config",
        "|key|env variable|description|type|presence|",
        "|-|-|-|-|-|",
        "|host|DB_HOST|db server host|-|-|",
        "|port|DB_PORT|db server port|-|-|",
        "",
    ]);

    assert_eq!(write_doc(&options), expected);
}

#[test]
fn test_doc_generated_from_loader_options() {
    let pg = ConfigOptions::new("pg")
        .with_key_option(
            "connections.0.host",
            KeyOptions::env("PG_HOST").with_description("primary host"),
        )
        .with_env("connections.0.port", "PG_PORT");

    let options = DocOptions::new([("env", "env variable"), ("description", "description")])
        .with_placeholder("-")
        .with_config(&pg)
        .with_config(ConfigDoc::new("redis").with_description("cache"));

    let expected = join_as_lines(&[
        "## Configuration",
        "### pg",
        "|key|env variable|description|",
        "|-|-|-|",
        "|connections.0.host|PG_HOST|primary host|",
        "|connections.0.port|PG_PORT|-|",
        "### redis - cache",
        "",
    ]);

    assert_eq!(write_doc(&options), expected);
}

#[test]
fn test_declared_but_empty_key_docs_render_bare_table() {
    let mut config = ConfigDoc::new("empty");
    config.key_options = Some(Vec::new());

    let doc = write_doc(&DocOptions::new([("env", "env variable")]).with_config(config));
    assert_eq!(
        doc,
        join_as_lines(&["## Configuration", "### empty", "|key|env variable|", "|-|-|", ""])
    );
}
