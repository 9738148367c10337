use chrono::{DateTime, Utc};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashSet;
use tracing::warn;

use crate::models::NewsArticle;

const SOURCE_NAME: &str = "Google News";

#[derive(Clone, Copy, PartialEq)]
enum ItemField {
    Title,
    Link,
    PubDate,
}

#[derive(Default)]
struct ItemDraft {
    title: String,
    link: String,
    pub_date: String,
}

impl ItemDraft {
    /// Missing title or link drops the item; an unparsable publish date
    /// keeps it with `published_at = None`.
    fn build(self) -> Option<NewsArticle> {
        let title = self.title.trim().to_string();
        let url = self.link.trim().to_string();
        if title.is_empty() || url.is_empty() {
            return None;
        }

        let published_at = DateTime::parse_from_rfc2822(self.pub_date.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc));

        Some(NewsArticle { title, url, source: SOURCE_NAME.to_string(), published_at })
    }
}

/// Extracts `<item>` title/link/pubDate triples from an RSS document and
/// deduplicates them by URL (falling back to title), preserving feed order.
pub fn parse_rss_items(xml: &str) -> Vec<NewsArticle> {
    let mut reader = Reader::from_str(xml);

    let mut articles: Vec<NewsArticle> = Vec::new();
    let mut draft: Option<ItemDraft> = None;
    let mut field: Option<ItemField> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"item" => {
                    draft = Some(ItemDraft::default());
                    field = None;
                }
                b"title" if draft.is_some() => field = Some(ItemField::Title),
                b"link" if draft.is_some() => field = Some(ItemField::Link),
                b"pubDate" if draft.is_some() => field = Some(ItemField::PubDate),
                _ => field = None,
            },
            Ok(Event::Text(t)) => {
                if let (Some(draft), Some(field)) = (draft.as_mut(), field) {
                    let text = t.unescape().unwrap_or_default();
                    push_field(draft, field, &text);
                }
            }
            Ok(Event::CData(t)) => {
                if let (Some(draft), Some(field)) = (draft.as_mut(), field) {
                    let text = String::from_utf8_lossy(t.as_ref()).into_owned();
                    push_field(draft, field, &text);
                }
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"item" => {
                    if let Some(article) = draft.take().and_then(ItemDraft::build) {
                        articles.push(article);
                    }
                    field = None;
                }
                _ => field = None,
            },
            Ok(Event::Eof) => break,
            // Malformed markup past this point: keep the items parsed so far.
            Err(e) => {
                warn!("RSS parse stopped early: {}", e);
                break;
            }
            Ok(_) => {}
        }
    }

    dedupe(articles)
}

fn push_field(draft: &mut ItemDraft, field: ItemField, text: &str) {
    match field {
        ItemField::Title => draft.title.push_str(text),
        ItemField::Link => draft.link.push_str(text),
        ItemField::PubDate => draft.pub_date.push_str(text),
    }
}

fn dedupe(articles: Vec<NewsArticle>) -> Vec<NewsArticle> {
    let mut seen: HashSet<String> = HashSet::new();
    articles
        .into_iter()
        .filter(|a| seen.insert(a.dedupe_key().to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(items: &str) -> String {
        format!(
            "<?xml version=\"1.0\"?><rss version=\"2.0\"><channel><title>feed</title>{}</channel></rss>",
            items
        )
    }

    #[test]
    fn parses_plain_and_cdata_titles() {
        let xml = feed(
            "<item><title><![CDATA[Gold prices surge in MCX trading]]></title>\
             <link>https://example.com/a</link>\
             <pubDate>Mon, 24 Aug 2026 09:30:00 GMT</pubDate></item>\
             <item><title>Silver demand picks up</title>\
             <link>https://example.com/b</link></item>",
        );

        let items = parse_rss_items(&xml);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Gold prices surge in MCX trading");
        assert!(items[0].published_at.is_some());
        assert_eq!(items[1].title, "Silver demand picks up");
        assert_eq!(items[1].source, "Google News");
    }

    #[test]
    fn item_without_link_is_dropped() {
        let xml = feed(
            "<item><title>No link here</title></item>\
             <item><title>Kept</title><link>https://example.com/k</link></item>",
        );

        let items = parse_rss_items(&xml);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Kept");
    }

    #[test]
    fn bad_pub_date_keeps_item_with_null_timestamp() {
        let xml = feed(
            "<item><title>Odd date</title><link>https://example.com/d</link>\
             <pubDate>not a date</pubDate></item>",
        );

        let items = parse_rss_items(&xml);
        assert_eq!(items.len(), 1);
        assert!(items[0].published_at.is_none());
    }

    #[test]
    fn duplicate_urls_collapse_in_feed_order() {
        let xml = feed(
            "<item><title>First</title><link>https://example.com/same</link></item>\
             <item><title>Second</title><link>https://example.com/same</link></item>",
        );

        let items = parse_rss_items(&xml);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "First");
    }

    #[test]
    fn channel_title_outside_items_is_ignored() {
        let xml = feed("<item><title>Real</title><link>https://example.com/r</link></item>");
        let items = parse_rss_items(&xml);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Real");
    }
}
