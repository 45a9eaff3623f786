use openscience_stats::query::{self, AnnualArgs, AuthorArgs, CommonArgs, LinksArgs, Query};
use openscience_stats::report::{self, ReportArgs, SkippedAuthor};
use openscience_stats::stats::{AnnualChart, AuthorStats};
use openscience_stats::store::SourceArgs;
use openscience_stats::ExportedLink;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn authors() -> serde_json::Value {
    serde_json::json!([
        {"ENID": 1, "firstName": "Amy", "lastName": "Lee", "email": "amy.lee@example.org"},
        {"ENID": 2, "firstName": "Jane", "lastName": "Doe", "email": "jane.doe@example.org"},
        {"ENID": 3, "firstName": "Sam", "lastName": "Quiet", "email": "sam.quiet@example.org"}
    ])
}

fn publications() -> serde_json::Value {
    serde_json::json!([
        {
            "doi": "10.1/a", "name": "Alpha", "date": "2019-03-01",
            "authors": "Lee, Amy; Doe, Jane", "citations": 10,
            "supplementary": {"code": {"github": ["https://github.com/lab/alpha"]}}
        },
        {
            "doi": "10.1/b", "name": "Beta", "date": "2021-07-01",
            "authors": "Lee, Amy", "citations": 1,
            "supplementary": {"data": {"geo": ["GSE2"]}, "code": {"gitlab": ["https://gitlab.com/lab/beta"]}}
        },
        {
            "doi": "10.1/c", "name": "Gamma", "date": "2017-01-01",
            "authors": "Doe, Jane", "citations": 3,
            "supplementary": {}
        }
    ])
}

fn file_source(dir: &Path) -> SourceArgs {
    SourceArgs {
        data: Some(dir.to_path_buf()),
        api_url: None,
        timeout: 5,
    }
}

fn write_snapshot(dir: &Path) {
    let to_lines = |value: serde_json::Value| -> String {
        value
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    };
    fs::write(dir.join("authors.jsonl"), to_lines(authors())).unwrap();
    fs::write(dir.join("publications.jsonl"), to_lines(publications())).unwrap();
}

fn common(source: SourceArgs, output: PathBuf) -> CommonArgs {
    CommonArgs {
        source,
        output: Some(output),
    }
}

#[tokio::test]
async fn test_queries_against_document_api() {
    let temp_dir = TempDir::new().unwrap();
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/authors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(authors()))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/publications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(publications()))
        .mount(&mock_server)
        .await;

    let source = SourceArgs {
        data: None,
        api_url: Some(mock_server.uri()),
        timeout: 5,
    };

    // Author stats
    let stats_file = temp_dir.path().join("author.json");
    query::run_async(Query::Author(AuthorArgs {
        common: common(source.clone(), stats_file.clone()),
        enid: 1,
        since: None,
    }))
    .await
    .unwrap();

    let stats: AuthorStats =
        serde_json::from_str(&fs::read_to_string(&stats_file).unwrap()).unwrap();
    assert_eq!(stats.author.name, "Lee, Amy");
    assert_eq!(stats.total_publications, 2);
    assert_eq!(stats.total_citations, 11);
    let code = stats
        .category_stats
        .get(&openscience_stats::taxonomy::ResourceType::Code)
        .unwrap();
    assert_eq!(code.author_contributions, 2);
    assert_eq!(code.rank, 1);
    assert_eq!(code.percentage, 34);
    assert_eq!(code.open_science_percentage, Some(100));

    // Institution annual chart
    let annual_file = temp_dir.path().join("annual.json");
    query::run_async(Query::Annual(AnnualArgs {
        common: common(source.clone(), annual_file.clone()),
        email: None,
        since: None,
    }))
    .await
    .unwrap();

    let chart: AnnualChart =
        serde_json::from_str(&fs::read_to_string(&annual_file).unwrap()).unwrap();
    assert_eq!(chart.labels, vec!["2019", "2021"]);

    // Unknown author is reported as null, not a failure
    let missing_file = temp_dir.path().join("missing.json");
    query::run_async(Query::Author(AuthorArgs {
        common: common(source, missing_file.clone()),
        enid: 99,
        since: None,
    }))
    .await
    .unwrap();
    assert_eq!(fs::read_to_string(&missing_file).unwrap().trim(), "null");
}

#[tokio::test]
async fn test_links_export_as_jsonl() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = temp_dir.path().join("data");
    fs::create_dir_all(&data_dir).unwrap();
    write_snapshot(&data_dir);

    let output = temp_dir.path().join("links.jsonl");
    query::run_async(Query::Links(LinksArgs {
        common: common(file_source(&data_dir), output.clone()),
        enid: 1,
        jsonl: true,
    }))
    .await
    .unwrap();

    let links: Vec<ExportedLink> = fs::read_to_string(&output)
        .unwrap()
        .lines()
        .filter_map(|l| serde_json::from_str(l).ok())
        .collect();

    assert_eq!(links.len(), 3);
    assert!(links.iter().all(|l| l.scientist == "Lee, Amy"));
    assert_eq!(links[0].publication_title, "Alpha");
}

#[test]
fn test_report_writes_every_author() {
    let temp_dir = TempDir::new().unwrap();
    let data_dir = temp_dir.path().join("data");
    let output_dir = temp_dir.path().join("report");
    fs::create_dir_all(&data_dir).unwrap();
    write_snapshot(&data_dir);

    let summary = report::run(ReportArgs {
        source: file_source(&data_dir),
        output: output_dir.clone(),
        since: None,
        threads: 1,
        batch_size: 2,
    })
    .unwrap();

    // Jane's only windowed paper is shared with Amy; Sam has none
    assert_eq!(summary.written, 2);
    assert_eq!(summary.skipped, 1);

    let stats: Vec<AuthorStats> = fs::read_to_string(output_dir.join("author_stats.jsonl"))
        .unwrap()
        .lines()
        .filter_map(|l| serde_json::from_str(l).ok())
        .collect();
    assert_eq!(stats.len(), 2);
    assert!(stats.iter().all(|s| s.platform_rankings.values().all(|r| r.len() == 3)));

    let skipped: Vec<SkippedAuthor> =
        fs::read_to_string(output_dir.join("author_stats.skipped.jsonl"))
            .unwrap()
            .lines()
            .filter_map(|l| serde_json::from_str(l).ok())
            .collect();
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0].enid, 3);
    assert_eq!(skipped[0].name, "Quiet, Sam");
}
