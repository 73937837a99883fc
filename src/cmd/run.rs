use crate::config::{FORMAT, Format, Settings};
use crate::error::InspectError;
use crate::inspect::{InspectResponse, Inspector, SearchConsole};
use colored::Colorize;
use serde::Serialize;
use std::time::Duration;

#[derive(Serialize, Debug)]
pub struct Outcome {
    pub index: usize,
    pub total: usize,
    pub url: String,
    #[serde(flatten)]
    pub status: Status,
}

#[derive(Serialize, Debug)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Status {
    Inspected { verdict: Option<String> },
    Failed { error: String },
}

impl Outcome {
    fn new(
        index: usize,
        total: usize,
        url: &str,
        res: Result<InspectResponse, InspectError>,
    ) -> Self {
        let status = match res {
            Ok(r) => Status::Inspected {
                verdict: r.verdict().map(str::to_owned),
            },
            Err(e) => Status::Failed {
                error: e.to_string(),
            },
        };
        Self {
            index,
            total,
            url: url.to_owned(),
            status,
        }
    }

    pub fn is_inspected(&self) -> bool {
        matches!(self.status, Status::Inspected { .. })
    }

    fn text(&self) -> String {
        match &self.status {
            Status::Inspected { .. } => {
                format!("[{}/{}] inspected: {}", self.index, self.total, self.url)
            }
            Status::Failed { error } => {
                format!("[{}/{}] failed: {} ({})", self.index, self.total, self.url, error)
            }
        }
    }

    fn print(&self) -> serde_json::Result<()> {
        match FORMAT.get() {
            Some(&Format::Json) => println!("{}", serde_json::to_string(self)?),
            _ if self.is_inspected() => println!("{}", self.text().green()),
            _ => println!("{}", self.text().red()),
        }
        Ok(())
    }
}

/// Submit every target in order, one at a time, pausing `delay` between calls.
/// A failed call is reported and the batch moves on.
pub async fn submit_all<I: Inspector>(
    inspector: &I,
    targets: &[String],
    delay: Duration,
) -> serde_json::Result<Vec<Outcome>> {
    let total = targets.len();
    let mut outcomes = Vec::with_capacity(total);
    for (i, url) in targets.iter().enumerate() {
        if i > 0 && !delay.is_zero() {
            async_std::task::sleep(delay).await;
        }
        let res = inspector.inspect(url).await;
        if let Err(e) = &res {
            tracing::warn!("inspection of {} failed: {}", url, e);
        }
        let outcome = Outcome::new(i + 1, total, url, res);
        outcome.print()?;
        outcomes.push(outcome);
    }
    Ok(outcomes)
}

pub async fn run(settings: &Settings) -> surf::Result<()> {
    let targets = crate::cmd::list::targets(settings).await?;
    if FORMAT.get() != Some(&Format::Json) {
        println!("Found {} guide/blog URLs in sitemap.", targets.len());
    }
    let inspector = SearchConsole::new(settings.token(), settings.site_url.as_str());
    let outcomes = submit_all(&inspector, &targets, settings.delay).await?;
    let inspected = outcomes.iter().filter(|o| o.is_inspected()).count();
    tracing::info!(
        "{} inspected, {} failed",
        inspected,
        outcomes.len() - inspected
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_server;
    use std::cell::RefCell;

    struct FailOn {
        bad: &'static str,
        seen: RefCell<Vec<String>>,
    }

    impl Inspector for FailOn {
        async fn inspect(&self, url: &str) -> Result<InspectResponse, InspectError> {
            self.seen.borrow_mut().push(url.to_owned());
            if url == self.bad {
                return Err(InspectError::Status {
                    status: 500,
                    body: "Internal Server Error".into(),
                });
            }
            Ok(serde_json::from_str(
                r#"{"inspectionResult":{"indexStatusResult":{"verdict":"PASS"}}}"#,
            )?)
        }
    }

    fn targets() -> Vec<String> {
        (1..=5)
            .map(|i| format!("https://www.y-link.no/blog/post-{i}"))
            .collect()
    }

    #[async_std::test]
    async fn one_failure_does_not_stop_the_batch() {
        let inspector = FailOn {
            bad: "https://www.y-link.no/blog/post-3",
            seen: RefCell::default(),
        };
        let targets = targets();
        let outcomes = submit_all(&inspector, &targets, Duration::ZERO).await.unwrap();

        assert_eq!(*inspector.seen.borrow(), targets);
        assert_eq!(outcomes.iter().filter(|o| o.is_inspected()).count(), 4);
        let failed: Vec<_> = outcomes.iter().filter(|o| !o.is_inspected()).collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(
            failed[0].text(),
            "[3/5] failed: https://www.y-link.no/blog/post-3 (HTTP 500: Internal Server Error)"
        );
        assert_eq!(
            outcomes[0].text(),
            "[1/5] inspected: https://www.y-link.no/blog/post-1"
        );
    }

    #[async_std::test]
    async fn server_error_for_one_url_over_http() {
        let (base, requests) = test_server::start_with(|request| {
            if request.contains("post-3") {
                test_server::response("500 Internal Server Error", &[], "")
            } else {
                test_server::response(
                    "200 OK",
                    &[("Content-Type", "application/json")],
                    r#"{"inspectionResult":{}}"#,
                )
            }
        });
        let inspector = SearchConsole::new("tok", "sc-domain:y-link.no")
            .with_endpoint(format!("{base}/v1/urlInspection/index:inspect"));
        let outcomes = submit_all(&inspector, &targets(), Duration::ZERO).await.unwrap();

        assert_eq!(requests.lock().unwrap().len(), 5);
        assert_eq!(outcomes.iter().filter(|o| o.is_inspected()).count(), 4);
        assert!(!outcomes[2].is_inspected());
        assert!(
            outcomes[2]
                .text()
                .starts_with("[3/5] failed: https://www.y-link.no/blog/post-3 (HTTP 500")
        );
    }

    #[async_std::test]
    async fn empty_target_list_makes_no_calls() {
        let inspector = FailOn {
            bad: "",
            seen: RefCell::default(),
        };
        let outcomes = submit_all(&inspector, &[], Duration::from_secs(60)).await.unwrap();
        assert!(outcomes.is_empty());
        assert!(inspector.seen.borrow().is_empty());
    }

    #[async_std::test]
    async fn pauses_between_calls() {
        let inspector = FailOn {
            bad: "",
            seen: RefCell::default(),
        };
        let targets = targets();
        let delay = Duration::from_millis(20);
        let start = std::time::Instant::now();
        submit_all(&inspector, &targets[..2], delay).await.unwrap();
        assert!(start.elapsed() >= delay);
    }

    #[test]
    fn json_outcome_shape() {
        let o = Outcome::new(
            2,
            3,
            "https://x.test/guides/a",
            Err(InspectError::Transport("connection refused".into())),
        );
        assert_eq!(
            serde_json::to_value(&o).unwrap(),
            serde_json::json!({
                "index": 2,
                "total": 3,
                "url": "https://x.test/guides/a",
                "status": "failed",
                "error": "connection refused",
            })
        );
    }
}
