use std::collections::HashSet;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Local;
use serde::Deserialize;
use tracing::{info, warn};

use browserless_client::BrowserlessClient;
use yeouido_common::ArticleStub;

use crate::sources::section_url;

/// Per-section scrape budgets.
#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    pub max_articles: usize,
    pub max_clicks: u32,
    pub settle_ms: u64,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            max_articles: 100,
            max_clicks: 10,
            settle_ms: 3000,
        }
    }
}

// --- SectionScraper trait ---

#[async_trait]
pub trait SectionScraper: Send + Sync {
    /// Collect article stubs from one section listing, skipping URLs already
    /// in `seen`. Returned stubs carry URLs not present in `seen`.
    async fn collect(
        &self,
        section_id: &str,
        opts: &ScrapeOptions,
        seen: &HashSet<String>,
    ) -> Result<Vec<ArticleStub>>;
}

// --- Browserless-backed scraper ---

/// Puppeteer script run server-side by Browserless /function. One fresh
/// browser context per invocation; the service tears it down on every exit
/// path. The loop enumerates visible cards, skips known URLs, clicks the
/// load-more control by visible label, and settles between rounds.
const PAGINATION_SCRIPT: &str = r#"
export default async function ({ page, context }) {
    const {
        url, listSelector, itemSelector, titleSelector, pressSelector,
        dateSelector, moreLabel, maxArticles, maxClicks, settleMs, seenUrls,
    } = context;

    await page.goto(url, { timeout: 30000, waitUntil: "domcontentloaded" });
    await page.waitForSelector(listSelector, { timeout: 30000 });

    const seen = new Set(seenUrls);
    const cards = [];
    let clicks = 0;

    for (;;) {
        const items = await page.$$eval(
            itemSelector,
            (els, sel) =>
                els.map((el) => {
                    const title = el.querySelector(sel.title);
                    const press = el.querySelector(sel.press);
                    const date = el.querySelector(sel.date);
                    return {
                        title: title ? title.innerText.trim() : "",
                        href: title ? title.getAttribute("href") : "",
                        press: press ? press.innerText.trim() : "",
                        date: date ? date.innerText.trim() : "",
                    };
                }),
            { title: titleSelector, press: pressSelector, date: dateSelector }
        );

        for (const item of items) {
            if (!item.href || !item.title || seen.has(item.href)) continue;
            seen.add(item.href);
            cards.push(item);
            if (cards.length >= maxArticles) break;
        }
        if (cards.length >= maxArticles || clicks >= maxClicks) break;

        const clicked = await page.evaluate((label) => {
            const candidates = Array.from(document.querySelectorAll("a, button"));
            const el = candidates.find(
                (c) => c.textContent && c.textContent.includes(label)
            );
            if (!el || el.disabled || el.offsetParent === null) return false;
            el.click();
            return true;
        }, moreLabel);
        if (!clicked) break;

        clicks += 1;
        await new Promise((resolve) => setTimeout(resolve, settleMs));
    }

    return { data: cards, type: "application/json" };
}
"#;

const LIST_SELECTOR: &str = ".sa_list";
const ITEM_SELECTOR: &str = ".sa_list .sa_item";
const TITLE_SELECTOR: &str = ".sa_text_title";
const PRESS_SELECTOR: &str = ".sa_text_press";
const DATE_SELECTOR: &str = ".sa_text_datetime";
const MORE_LABEL: &str = "기사 더보기";

/// Raw card as extracted in the page context.
#[derive(Debug, Deserialize)]
pub(crate) struct RawCard {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub href: String,
    #[serde(default)]
    pub press: String,
    #[serde(default)]
    pub date: String,
}

pub struct BrowserlessSectionScraper {
    client: BrowserlessClient,
}

impl BrowserlessSectionScraper {
    pub fn new(base_url: &str, token: Option<&str>) -> Self {
        info!(base_url, "Using BrowserlessSectionScraper");
        Self {
            client: BrowserlessClient::new(base_url, token),
        }
    }
}

#[async_trait]
impl SectionScraper for BrowserlessSectionScraper {
    async fn collect(
        &self,
        section_id: &str,
        opts: &ScrapeOptions,
        seen: &HashSet<String>,
    ) -> Result<Vec<ArticleStub>> {
        let url = section_url(section_id);
        info!(
            section = section_id,
            url = url.as_str(),
            max_articles = opts.max_articles,
            max_clicks = opts.max_clicks,
            "Section scrape starting"
        );

        let context = serde_json::json!({
            "url": url,
            "listSelector": LIST_SELECTOR,
            "itemSelector": ITEM_SELECTOR,
            "titleSelector": TITLE_SELECTOR,
            "pressSelector": PRESS_SELECTOR,
            "dateSelector": DATE_SELECTOR,
            "moreLabel": MORE_LABEL,
            "maxArticles": opts.max_articles,
            "maxClicks": opts.max_clicks,
            "settleMs": opts.settle_ms,
            "seenUrls": seen.iter().collect::<Vec<_>>(),
        });

        let value = self
            .client
            .function(PAGINATION_SCRIPT, context)
            .await
            .context("Browserless function request failed")?;

        let cards: Vec<RawCard> =
            serde_json::from_value(value).context("Unexpected pagination payload")?;

        let today = Local::now().format("%Y-%m-%d").to_string();
        let stubs = stubs_from_cards(cards, section_id, &today);

        info!(
            section = section_id,
            articles = stubs.len(),
            "Section scrape complete"
        );
        Ok(stubs)
    }
}

/// Turn raw cards into stubs: drop cards missing a link or title, default
/// the date to today when the card carried none.
pub(crate) fn stubs_from_cards(
    cards: Vec<RawCard>,
    section_id: &str,
    today: &str,
) -> Vec<ArticleStub> {
    let mut stubs = Vec::new();
    for card in cards {
        if card.href.is_empty() || card.title.is_empty() {
            warn!(section = section_id, "Skipping card without link or title");
            continue;
        }
        let date = if card.date.is_empty() {
            today.to_string()
        } else {
            card.date
        };
        stubs.push(ArticleStub {
            title: card.title,
            url: card.href,
            press: card.press,
            date,
            section: section_id.to_string(),
        });
    }
    stubs
}

/// Merge stub streams into one in which every URL appears at most once,
/// preserving first occurrence.
pub fn dedupe_stubs(stubs: Vec<ArticleStub>) -> Vec<ArticleStub> {
    let mut seen = HashSet::new();
    stubs
        .into_iter()
        .filter(|s| seen.insert(s.url.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(title: &str, href: &str, date: &str) -> RawCard {
        RawCard {
            title: title.into(),
            href: href.into(),
            press: "연합뉴스".into(),
            date: date.into(),
        }
    }

    #[test]
    fn cards_without_link_or_title_are_dropped() {
        let cards = vec![
            card("제목", "https://n.news.example.com/1", "2026-08-07 09:00"),
            card("", "https://n.news.example.com/2", ""),
            card("제목만", "", ""),
        ];
        let stubs = stubs_from_cards(cards, "100", "2026-08-07");
        assert_eq!(stubs.len(), 1);
        assert_eq!(stubs[0].url, "https://n.news.example.com/1");
        assert_eq!(stubs[0].section, "100");
    }

    #[test]
    fn missing_date_defaults_to_today() {
        let cards = vec![card("제목", "https://n.news.example.com/1", "")];
        let stubs = stubs_from_cards(cards, "100", "2026-08-07");
        assert_eq!(stubs[0].date, "2026-08-07");
    }

    #[test]
    fn dedupe_preserves_first_occurrence() {
        let stubs = vec![
            ArticleStub {
                title: "politics".into(),
                url: "https://n.news.example.com/1".into(),
                press: "a".into(),
                date: "d".into(),
                section: "100".into(),
            },
            ArticleStub {
                title: "economy".into(),
                url: "https://n.news.example.com/1".into(),
                press: "b".into(),
                date: "d".into(),
                section: "101".into(),
            },
            ArticleStub {
                title: "other".into(),
                url: "https://n.news.example.com/2".into(),
                press: "c".into(),
                date: "d".into(),
                section: "101".into(),
            },
        ];
        let deduped = dedupe_stubs(stubs);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].section, "100", "first occurrence wins");
        assert_eq!(deduped[1].url, "https://n.news.example.com/2");
    }
}
