//! Background feed fetches: a deterministic demo provider standing in
//! for the job-matching backend.
//!
//! Pages are synthesised from a seed so runs are reproducible, and a
//! configurable latency keeps the loading placeholders honest. Results
//! come back over a channel stamped with the tab and generation they
//! were requested under so the main loop can drop pages made stale by
//! a refresh.

use std::time::Duration;

use chrono::Utc;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::debug;

use crate::app::state::FeedTab;
use crate::core::feed::{AdCard, CardItem, JobCard, Stage};

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("job feed temporarily unavailable (page {page})")]
    Unavailable { page: usize },
    #[error("requested page {page} is past the end of the feed")]
    PastEnd { page: usize },
}

/// What a finished fetch reports back.
#[derive(Debug)]
pub enum FeedUpdate {
    Page {
        items: Vec<CardItem>,
        has_more: bool,
    },
    Failed {
        error: FeedError,
    },
}

/// Demo provider knobs, merged from config and CLI at startup.
#[derive(Debug, Clone)]
pub struct FeedParams {
    pub seed: u64,
    /// How many jobs the provider pretends to have.
    pub total: usize,
    pub page_size: usize,
    pub latency_ms: u64,
    /// Interleave sponsored cards into the jobs feed.
    pub ads: bool,
    /// Fail every third page's first attempt, to exercise recovery.
    pub flaky: bool,
}

/// Kick off one page fetch; the result arrives on `tx` after the
/// simulated latency. Fire-and-forget, nobody awaits the handle.
pub fn spawn_fetch(
    tx: mpsc::UnboundedSender<(FeedTab, u64, FeedUpdate)>,
    tab: FeedTab,
    generation: u64,
    page: usize,
    attempt: u32,
    params: FeedParams,
) {
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(params.latency_ms)).await;
        let update = match build_page(tab, page, attempt, &params) {
            Ok((items, has_more)) => {
                debug!(?tab, page, count = items.len(), has_more, "page fetched");
                FeedUpdate::Page { items, has_more }
            }
            Err(error) => {
                debug!(?tab, page, %error, "page fetch failed");
                FeedUpdate::Failed { error }
            }
        };
        let _ = tx.send((tab, generation, update));
    });
}

// ───────────────────────── fixtures ─────────────────────────

const TITLES: &[&str] = &[
    "Senior Rust Engineer",
    "Backend Developer",
    "Platform Engineer",
    "Embedded Firmware Engineer",
    "Site Reliability Engineer",
    "Data Pipeline Engineer",
    "Compiler Engineer",
    "Full-Stack Developer",
    "Systems Programmer",
    "Infrastructure Engineer",
    "Staff Engineer, Storage",
    "Network Engineer",
];

const ORGS: &[&str] = &[
    "Nordwind Labs",
    "Cobalt Systems",
    "Ferrous Works",
    "Kestrel Analytics",
    "Bluefin Data",
    "Hartmann & Co",
    "Quantis",
    "Mossbyte",
    "Relayline",
    "Arcadia Grid",
];

const LOCATIONS: &[&str] = &[
    "Berlin",
    "Amsterdam",
    "Remote (EU)",
    "London",
    "Stockholm",
    "Remote (US)",
    "Zurich",
    "Lisbon",
    "Copenhagen",
];

const TAG_POOL: &[&str] = &[
    "rust",
    "tokio",
    "kubernetes",
    "postgres",
    "grpc",
    "aws",
    "embedded",
    "wasm",
    "python",
    "terraform",
    "kafka",
    "ci/cd",
];

const SPONSORS: &[(&str, &str)] = &[
    ("CV Polish Pro", "Get your resume past the filters"),
    ("DevConf 2026", "Three days, forty talks, one hallway track"),
    ("MentorLoop", "Weekly 1:1s with senior engineers"),
];

/// Every this-many slots in the jobs feed is a sponsored card.
const AD_INTERVAL: usize = 7;

/// splitmix64; scatters fixture picks without pulling in an RNG crate.
fn mix(seed: u64, n: u64) -> u64 {
    let mut z = seed.wrapping_add(n.wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn pick<'a>(pool: &[&'a str], h: u64) -> &'a str {
    pool[(h % pool.len() as u64) as usize]
}

fn total_for(tab: FeedTab, params: &FeedParams) -> usize {
    match tab {
        FeedTab::Jobs => params.total,
        // The user applied to a fraction of what's out there.
        FeedTab::Applications => (params.total / 3).max(4),
    }
}

fn job_card(tab: FeedTab, global: usize, seed: u64) -> JobCard {
    let h = mix(seed, global as u64);
    let low = 60 + (h >> 24) % 80;
    let high = low + 20 + (h >> 32) % 30;
    let mut tags = vec![
        pick(TAG_POOL, h >> 40).to_string(),
        pick(TAG_POOL, h >> 48).to_string(),
        pick(TAG_POOL, h >> 52).to_string(),
    ];
    tags.dedup();
    let stage = match tab {
        FeedTab::Jobs => None,
        FeedTab::Applications => Some(match global % 4 {
            0 => Stage::Applied,
            1 => Stage::Screening,
            2 => Stage::Interview,
            _ => Stage::Offer,
        }),
    };
    JobCard {
        title: pick(TITLES, h).to_string(),
        org: pick(ORGS, h >> 8).to_string(),
        location: pick(LOCATIONS, h >> 16).to_string(),
        salary: format!("${low}k–${high}k"),
        tags,
        posted_at: Utc::now() - chrono::Duration::days(((h >> 56) % 28) as i64),
        stage,
    }
}

/// Synthesise one page. Pure, so the interesting cases are testable
/// without spinning up the async runtime.
pub fn build_page(
    tab: FeedTab,
    page: usize,
    attempt: u32,
    params: &FeedParams,
) -> Result<(Vec<CardItem>, bool), FeedError> {
    if params.flaky && attempt == 0 && page % 3 == 2 {
        return Err(FeedError::Unavailable { page });
    }

    let total = total_for(tab, params);
    let start = page.saturating_mul(params.page_size);
    if start >= total && page != 0 {
        return Err(FeedError::PastEnd { page });
    }
    let end = (start + params.page_size).min(total);

    let items = (start..end)
        .map(|global| {
            if params.ads && tab == FeedTab::Jobs && global % AD_INTERVAL == 3 {
                let (sponsor, tagline) =
                    SPONSORS[(mix(params.seed, global as u64) % SPONSORS.len() as u64) as usize];
                CardItem::Ad(AdCard {
                    sponsor: sponsor.to_string(),
                    tagline: tagline.to_string(),
                })
            } else {
                CardItem::Job(job_card(tab, global, params.seed))
            }
        })
        .collect();

    Ok((items, end < total))
}

// ───────────────────────── tests ─────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> FeedParams {
        FeedParams {
            seed: 7,
            total: 10,
            page_size: 4,
            latency_ms: 0,
            ads: true,
            flaky: false,
        }
    }

    #[test]
    fn pages_are_deterministic() {
        let a = build_page(FeedTab::Jobs, 1, 0, &params()).unwrap();
        let b = build_page(FeedTab::Jobs, 1, 0, &params()).unwrap();
        assert_eq!(a.0.len(), b.0.len());
        for (x, y) in a.0.iter().zip(&b.0) {
            match (x, y) {
                (CardItem::Job(j1), CardItem::Job(j2)) => {
                    assert_eq!(j1.title, j2.title);
                    assert_eq!(j1.org, j2.org);
                    assert_eq!(j1.salary, j2.salary);
                }
                (CardItem::Ad(a1), CardItem::Ad(a2)) => assert_eq!(a1, a2),
                _ => panic!("variant order changed between identical builds"),
            }
        }
    }

    #[test]
    fn page_boundaries_report_has_more() {
        let p = params();
        let (items, more) = build_page(FeedTab::Jobs, 0, 0, &p).unwrap();
        assert_eq!(items.len(), 4);
        assert!(more);

        let (items, more) = build_page(FeedTab::Jobs, 2, 0, &p).unwrap();
        assert_eq!(items.len(), 2);
        assert!(!more);

        assert!(matches!(
            build_page(FeedTab::Jobs, 3, 0, &p),
            Err(FeedError::PastEnd { page: 3 })
        ));
    }

    #[test]
    fn ads_interleave_only_where_enabled() {
        let mut p = params();
        p.total = 21;

        let all: Vec<_> = (0..6)
            .flat_map(|page| build_page(FeedTab::Jobs, page, 0, &p).unwrap().0)
            .collect();
        assert!(all.iter().any(|i| matches!(i, CardItem::Ad(_))));

        p.ads = false;
        let none: Vec<_> = (0..6)
            .flat_map(|page| build_page(FeedTab::Jobs, page, 0, &p).unwrap().0)
            .collect();
        assert!(none.iter().all(|i| matches!(i, CardItem::Job(_))));

        // The applications feed never carries ads.
        p.ads = true;
        let apps = build_page(FeedTab::Applications, 0, 0, &p).unwrap().0;
        assert!(apps.iter().all(|i| matches!(i, CardItem::Job(_))));
    }

    #[test]
    fn applications_carry_a_stage() {
        let (items, _) = build_page(FeedTab::Applications, 0, 0, &params()).unwrap();
        assert!(!items.is_empty());
        for item in &items {
            let CardItem::Job(job) = item else {
                panic!("unexpected ad on the applications tab")
            };
            assert!(job.stage.is_some());
        }

        let (jobs, _) = build_page(FeedTab::Jobs, 0, 0, &params()).unwrap();
        for item in &jobs {
            if let CardItem::Job(job) = item {
                assert!(job.stage.is_none());
            }
        }
    }

    #[test]
    fn flaky_pages_recover_on_the_next_attempt() {
        let mut p = params();
        p.flaky = true;
        p.total = 40;

        assert!(build_page(FeedTab::Jobs, 0, 0, &p).is_ok());
        assert!(matches!(
            build_page(FeedTab::Jobs, 2, 0, &p),
            Err(FeedError::Unavailable { page: 2 })
        ));
        assert!(build_page(FeedTab::Jobs, 2, 1, &p).is_ok());
    }

    #[test]
    fn an_empty_provider_yields_an_empty_exhausted_page() {
        let mut p = params();
        p.total = 0;
        let (items, more) = build_page(FeedTab::Jobs, 0, 0, &p).unwrap();
        assert!(items.is_empty());
        assert!(!more);
    }
}
