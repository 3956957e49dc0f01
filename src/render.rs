//! Rendering countries and errors onto a display surface.
//!
//! A [`DisplaySurface`] is append-only: renderers add to the end and never
//! replace what is already there, so a primary country and its neighbour
//! end up side by side.

use chrono::Utc;

use crate::model::{CountryRecord, LookupResponse, RenderRole};

/// Append-only output area with a visibility toggle.
pub trait DisplaySurface {
    /// Append trusted markup.
    fn append_html(&mut self, markup: &str);

    /// Append plain text; it is never interpreted as markup.
    fn append_text(&mut self, text: &str);

    /// Dim (`false`) or restore (`true`) the surface.
    fn set_visible(&mut self, visible: bool);
}

/// In-memory surface that renders to an HTML string.
///
/// Starts dimmed, as a page does while a lookup is loading.
#[derive(Debug, Clone, Default)]
pub struct HtmlSurface {
    content: String,
    visible: bool,
}

impl HtmlSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// The surface wrapped in its container element.
    pub fn to_html(&self) -> String {
        format!(
            r#"<div class="countries" style="opacity: {}">{}</div>"#,
            if self.visible { 1 } else { 0 },
            self.content
        )
    }
}

impl DisplaySurface for HtmlSurface {
    fn append_html(&mut self, markup: &str) {
        self.content.push_str(markup);
    }

    fn append_text(&mut self, text: &str) {
        self.content.push_str(&escape_html(text));
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

impl From<HtmlSurface> for LookupResponse {
    fn from(surface: HtmlSurface) -> Self {
        LookupResponse {
            rendered_at: Utc::now(),
            visible: surface.visible,
            html: surface.to_html(),
        }
    }
}

/// Population in millions with one decimal place, e.g. `10300000` -> `"10.3"`.
pub fn format_population(population: u64) -> String {
    format!("{:.1}", population as f64 / 1_000_000.0)
}

/// Append one country card to the end of `surface`.
pub fn render_country<S: DisplaySurface + ?Sized>(
    surface: &mut S,
    record: &CountryRecord,
    role: RenderRole,
) {
    let class = match role.css_class() {
        Some(extra) => format!("country {extra}"),
        None => "country".to_string(),
    };

    let html = format!(
        r#"
<article class="{class}">
  <img class="country__img" src="{flag}" />
  <div class="country__data">
    <h3 class="country__name">{name}</h3>
    <h4 class="country__region">{region}</h4>
    <p class="country__row"><span>👫</span>{population} million people</p>
    <p class="country__row"><span>🗣️</span>{languages}</p>
    <p class="country__row"><span>💰</span>{currencies}</p>
  </div>
</article>
"#,
        flag = escape_html(&record.flag_image_url),
        name = escape_html(&record.common_name),
        region = escape_html(&record.region),
        population = format_population(record.population_count),
        languages = escape_html(&record.language_names.join(", ")),
        currencies = escape_html(&record.currency_names.join(", ")),
    );

    surface.append_html(&html);
}

/// Append `message` as plain text to the end of `surface`.
pub fn render_error<S: DisplaySurface + ?Sized>(surface: &mut S, message: &str) {
    surface.append_text(message);
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
