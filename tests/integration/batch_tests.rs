//! Integration tests for batch runs
//!
//! Crawls several seeds against a wiremock server through the orchestrator
//! and the batch runner, and checks what reaches the output handlers.

use mail_ripple::config::UserAgentConfig;
use mail_ripple::crawler::{build_http_client, run_batches, BatchOrchestrator, CrawlLimits, SiteCrawler};
use mail_ripple::input::{SeedRecord, SeedSource};
use mail_ripple::output::{
    EmailRow, MemoryOutput, OutputError, OutputHandler, OutputResult, RunStatistics,
    TsvOutputHandler,
};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_crawler() -> SiteCrawler {
    let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(5))
        .expect("Failed to build HTTP client");
    SiteCrawler::new(
        client,
        CrawlLimits {
            max_domains: 10,
            max_iterations: 20,
        },
    )
}

/// Serves `/site{n}/` for every n with a single email `contact{n}@site.example`
async fn start_sites(count: usize) -> MockServer {
    let server = MockServer::start().await;
    for n in 0..count {
        Mock::given(method("GET"))
            .and(path(format!("/site{}/", n)))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                format!("<html><body>contact{}@site.example</body></html>", n),
                "text/html",
            ))
            .mount(&server)
            .await;
    }
    server
}

fn records(server: &MockServer, count: usize) -> Vec<SeedRecord> {
    (0..count)
        .map(|n| {
            SeedRecord::new(format!("k{}", n), format!("{}/site{}", server.uri(), n))
                .with_name(format!("Site {}", n))
        })
        .collect()
}

/// Fails every write for one batch index and records the rest
#[derive(Default)]
struct FlakyOutput {
    fail_on: usize,
    written: Vec<usize>,
    finished: bool,
}

impl OutputHandler for FlakyOutput {
    fn write_batch(&mut self, batch_index: usize, _rows: &[EmailRow]) -> OutputResult<()> {
        if batch_index == self.fail_on {
            return Err(OutputError::Write("disk full".to_string()));
        }
        self.written.push(batch_index);
        Ok(())
    }

    fn finish(&mut self, _stats: &RunStatistics) -> OutputResult<()> {
        self.finished = true;
        Ok(())
    }
}

#[tokio::test]
async fn test_concurrent_run_matches_sequential_run() {
    let server = start_sites(6).await;
    let seeds = records(&server, 6);

    let sequential = BatchOrchestrator::new(test_crawler(), 1)
        .run_batch(&seeds)
        .await;
    let concurrent = BatchOrchestrator::new(test_crawler(), 4)
        .run_batch(&seeds)
        .await;

    assert_eq!(sequential.len(), 6);
    assert_eq!(sequential, concurrent);
    assert!(concurrent["k3"]["127.0.0.1"].contains("contact3@site.example"));
}

#[tokio::test]
async fn test_every_key_present_even_without_emails() {
    let server = start_sites(2).await;
    let mut source = records(&server, 2);
    source.push(SeedRecord::new("dead", "http://127.0.0.1:9/"));
    let seeds = source.load_seeds().expect("in-memory seeds always load");

    let results = BatchOrchestrator::new(test_crawler(), 2)
        .run_batch(&seeds)
        .await;

    assert_eq!(results.len(), 3);
    assert!(results["dead"].is_empty());
    assert!(!results["k0"].is_empty());
}

#[tokio::test]
async fn test_run_batches_writes_one_file_per_batch() {
    let server = start_sites(5).await;
    let seeds = records(&server, 5);
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let mut output = TsvOutputHandler::new(dir.path()).expect("Failed to create output dir");

    let orchestrator = BatchOrchestrator::new(test_crawler(), 2);
    let stats = run_batches(&orchestrator, &seeds, 2, &mut output).await;

    assert_eq!(stats.batches_written, 3);
    assert_eq!(stats.rows_written, 5);
    assert_eq!(stats.seeds_with_emails, 5);
    assert!(!stats.cancelled);

    let first = std::fs::read_to_string(output.batch_path(0)).expect("File-0.csv missing");
    let lines: Vec<&str> = first.lines().collect();
    assert_eq!(lines[0], "key\tname\thomepage\thostname\temail");
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("k0\tSite 0\t"));
    assert!(lines[1].ends_with("\t127.0.0.1\tcontact0@site.example"));

    let last = std::fs::read_to_string(output.batch_path(2)).expect("File-2.csv missing");
    assert_eq!(last.lines().count(), 2);
}

#[tokio::test]
async fn test_failed_batch_does_not_stop_the_run() {
    let server = start_sites(6).await;
    let seeds = records(&server, 6);
    let mut output = FlakyOutput {
        fail_on: 1,
        ..Default::default()
    };

    let orchestrator = BatchOrchestrator::new(test_crawler(), 3);
    let stats = run_batches(&orchestrator, &seeds, 2, &mut output).await;

    assert_eq!(output.written, vec![0, 2]);
    assert!(output.finished);
    assert_eq!(stats.failed_batches, vec![1]);
    assert_eq!(stats.batches_written, 2);
    assert_eq!(stats.rows_written, 4);
}

#[tokio::test]
async fn test_cancelled_run_writes_nothing() {
    let server = start_sites(3).await;
    let seeds = records(&server, 3);
    let mut output = MemoryOutput::default();

    let orchestrator = BatchOrchestrator::new(test_crawler(), 2);
    orchestrator.cancellation_token().cancel();
    let stats = run_batches(&orchestrator, &seeds, 2, &mut output).await;

    assert!(stats.cancelled);
    assert_eq!(stats.batches_written, 0);
    assert!(output.batches.is_empty());
}
