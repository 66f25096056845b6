use std::sync::LazyLock;

use ego_tree::NodeId;
use regex::Regex;
use saver_logging::{saver_error, saver_warn};
use scraper::node::{Node, Text};
use scraper::{ElementRef, Html, Selector};

/// Body text used when the quote paragraph is not present in the embed.
pub const MISSING_TEXT_SENTINEL: &str = "Could not extract tweet text";
/// Body text used when the embed could not be processed at all.
pub const EXTRACTION_ERROR_SENTINEL: &str = "Error extracting tweet text";

/// First paragraph with a language attribute inside the standard quote container.
pub const DEFAULT_QUOTE_SELECTOR: &str = "blockquote.twitter-tweet p[lang]";

static TRAILING_SHORT_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https://t\.co/[A-Za-z0-9_]+$").expect("short link pattern is valid")
});

pub trait Extractor: Send + Sync {
    /// Never fails; degrades to one of the sentinel strings.
    fn extract(&self, embed_html: &str) -> String;
}

/// Pulls the post body out of an oEmbed `html` fragment:
/// - selects the first node matching `selector`
/// - turns every `<br>` inside it into a `"\n"` text node
/// - reads the text content and drops a trailing short link.
#[derive(Debug, Clone)]
pub struct EmbedTextExtractor {
    selector: String,
}

impl EmbedTextExtractor {
    pub fn new() -> Self {
        Self::with_selector(DEFAULT_QUOTE_SELECTOR)
    }

    pub fn with_selector(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
        }
    }

    fn try_extract(&self, embed_html: &str) -> Result<String, ExtractFailure> {
        let selector = Selector::parse(&self.selector)
            .map_err(|err| ExtractFailure::Selector(err.to_string()))?;
        let mut fragment = Html::parse_fragment(embed_html);

        let quote_id = fragment
            .select(&selector)
            .next()
            .map(|el| el.id())
            .ok_or(ExtractFailure::NodeMissing)?;

        replace_line_breaks(&mut fragment, quote_id);

        let quote = fragment
            .tree
            .get(quote_id)
            .and_then(ElementRef::wrap)
            .ok_or(ExtractFailure::NodeMissing)?;
        let text: String = quote.text().collect();

        Ok(strip_trailing_short_link(&text))
    }
}

impl Default for EmbedTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for EmbedTextExtractor {
    fn extract(&self, embed_html: &str) -> String {
        match self.try_extract(embed_html) {
            Ok(text) => text,
            Err(ExtractFailure::NodeMissing) => {
                saver_warn!("No element matching '{}' in embed html", self.selector);
                MISSING_TEXT_SENTINEL.to_string()
            }
            Err(ExtractFailure::Selector(message)) => {
                saver_error!("Error extracting tweet text: {}", message);
                EXTRACTION_ERROR_SENTINEL.to_string()
            }
        }
    }
}

enum ExtractFailure {
    NodeMissing,
    Selector(String),
}

/// Line breaks must become text in the tree before the text content is read;
/// `<br>` has no text of its own and would otherwise vanish.
fn replace_line_breaks(fragment: &mut Html, root: NodeId) {
    let breaks: Vec<NodeId> = match fragment.tree.get(root) {
        Some(node) => node
            .descendants()
            .filter(|n| matches!(n.value(), Node::Element(el) if el.name().eq_ignore_ascii_case("br")))
            .map(|n| n.id())
            .collect(),
        None => return,
    };

    for id in breaks {
        if let Some(mut br) = fragment.tree.get_mut(id) {
            br.insert_before(Node::Text(Text { text: "\n".into() }));
            br.detach();
        }
    }
}

/// Removes a short link only when it ends the text; links elsewhere stay.
pub fn strip_trailing_short_link(text: &str) -> String {
    let trimmed = text.trim_end();
    TRAILING_SHORT_LINK
        .replace(trimmed, "")
        .trim()
        .to_string()
}
