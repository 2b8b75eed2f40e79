//! # dpd-ui
//!
//! HTML render sink. Turns a `BoardView` into a page with askama templates.

use std::sync::Mutex;

use askama::Template;
use chrono::{DateTime, Utc};
use dpd_core::models::{Filter, Reply, Topic};
use dpd_core::traits::{BoardView, RenderSink};

pub const EMPTY_PLACEHOLDER: &str = "No topics in this category yet. Be the first to post one!";

/// Which body the page shows.
pub enum Status {
    Loading,
    Unavailable(String),
    Ready,
}

pub struct FilterLink {
    pub value: String,
    pub label: &'static str,
    pub active: bool,
}

pub struct ReplyLine {
    pub byline: String,
    pub content: String,
}

pub struct TopicCard {
    pub id: i64,
    pub category: &'static str,
    pub title: String,
    pub byline: String,
    pub content: String,
    pub category_line: String,
    pub reply_count: String,
    pub replies: Vec<ReplyLine>,
}

#[derive(Template)]
#[template(path = "board.html")]
pub struct BoardTemplate<'a> {
    pub title: &'a str,
    pub status: Status,
    pub filters: Vec<FilterLink>,
    pub cards: Vec<TopicCard>,
    pub empty_placeholder: &'a str,
}

/// "Apr 28, 2025"
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%b %-d, %Y").to_string()
}

pub fn reply_count(n: usize) -> String {
    if n == 1 {
        "1 reply".to_string()
    } else {
        format!("{n} replies")
    }
}

fn filter_label(filter: Filter) -> &'static str {
    match filter {
        Filter::All => "All",
        Filter::Category(c) => c.label(),
    }
}

impl From<&Reply> for ReplyLine {
    fn from(reply: &Reply) -> Self {
        Self {
            byline: format!("{} • {}", reply.author, format_date(&reply.date)),
            content: reply.content.clone(),
        }
    }
}

impl From<&Topic> for TopicCard {
    fn from(topic: &Topic) -> Self {
        Self {
            id: topic.id,
            category: topic.category.as_str(),
            title: topic.title.clone(),
            byline: format!("Posted by: {} on {}", topic.author, format_date(&topic.date)),
            content: topic.content.clone(),
            category_line: format!("Category: {}", topic.category.label()),
            reply_count: reply_count(topic.replies.len()),
            replies: topic.replies.iter().map(ReplyLine::from).collect(),
        }
    }
}

impl<'a> BoardTemplate<'a> {
    pub fn from_view(view: &BoardView) -> Self {
        let (status, active, cards) = match view {
            BoardView::Loading => (Status::Loading, Filter::All, Vec::new()),
            BoardView::Unavailable(message) => {
                (Status::Unavailable(message.clone()), Filter::All, Vec::new())
            }
            BoardView::Topics { filter, topics } => (
                Status::Ready,
                *filter,
                topics.iter().map(TopicCard::from).collect(),
            ),
        };

        let filters = Filter::choices()
            .map(|f| FilterLink {
                value: f.to_string(),
                label: filter_label(f),
                active: f == active,
            })
            .collect();

        Self {
            title: "Deer Park Debate",
            status,
            filters,
            cards,
            empty_placeholder: EMPTY_PLACEHOLDER,
        }
    }
}

pub fn render_html(view: &BoardView) -> Result<String, askama::Error> {
    BoardTemplate::from_view(view).render()
}

/// A `RenderSink` that keeps the most recently rendered page.
#[derive(Default)]
pub struct HtmlRenderer {
    page: Mutex<String>,
}

impl HtmlRenderer {
    /// Starts out showing the loading page.
    pub fn new() -> Self {
        let renderer = Self::default();
        renderer.render(&BoardView::Loading);
        renderer
    }

    pub fn current_page(&self) -> String {
        match self.page.lock() {
            Ok(page) => page.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl RenderSink for HtmlRenderer {
    fn render(&self, view: &BoardView) {
        let html = match render_html(view) {
            Ok(html) => html,
            Err(e) => {
                tracing::error!(error = %e, "template rendering failed");
                return;
            }
        };
        match self.page.lock() {
            Ok(mut page) => *page = html,
            Err(poisoned) => *poisoned.into_inner() = html,
        }
    }
}
