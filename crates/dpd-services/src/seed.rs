//! Sample topics shown on a client's very first run.

use chrono::{DateTime, Utc};
use dpd_core::models::{Category, Reply, Topic};

fn at(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .map(|d| d.with_timezone(&Utc))
        .unwrap_or_default()
}

fn reply(id: i64, author: &str, content: &str, date: &str) -> Reply {
    Reply {
        id,
        author: author.to_string(),
        content: content.to_string(),
        date: at(date),
        user_id: None,
    }
}

/// The fixed three-topic starter set. Never regenerated once data exists.
pub fn sample_topics() -> Vec<Topic> {
    vec![
        Topic {
            id: 1,
            title: "Should Social Media Be Regulated Like Public Utilities?".into(),
            content: "As social media platforms continue to dominate our communication landscape, \
                should they be regulated like public utilities? These platforms now serve essential \
                communication functions in society, but they're run by private companies with \
                profit motives. Does this create conflicts of interest that harm the public good?"
                .into(),
            author: "Moderator".into(),
            category: Category::Politics,
            date: at("2025-04-28T12:00:00Z"),
            replies: vec![
                reply(
                    101,
                    "DebateEnthusiast",
                    "I believe regulation is necessary. These platforms have become too central to \
                     public discourse to remain unregulated. When a private company controls what is \
                     essentially the modern public square, there needs to be oversight.",
                    "2025-04-29T09:15:00Z",
                ),
                reply(
                    102,
                    "FreeMarket42",
                    "Disagree strongly. Government regulation would stifle innovation and \
                     potentially lead to censorship issues. The market will correct problems if \
                     users demand better practices.",
                    "2025-04-30T14:22:00Z",
                ),
            ],
            user_id: None,
        },
        Topic {
            id: 2,
            title: "Is AI Art Really Art?".into(),
            content: "With the rise of AI-generated images, music, and writing, we need to \
                reconsider what constitutes 'art.' Does art require human intention, emotion, and \
                experience? Or can something created by an algorithm based on patterns from human \
                art still be considered legitimate art?"
                .into(),
            author: "ArtPhilosopher".into(),
            category: Category::Society,
            date: at("2025-05-01T08:30:00Z"),
            replies: vec![reply(
                201,
                "TraditionalistView",
                "Art is fundamentally human expression. While AI can create interesting images, \
                 they lack the lived experience and emotional intent that gives art its depth and \
                 meaning.",
                "2025-05-01T10:45:00Z",
            )],
            user_id: None,
        },
        Topic {
            id: 3,
            title: "Should High School Education Focus More on Practical Skills?".into(),
            content: "Many students graduate high school without basic financial literacy, home \
                economics skills, or career preparation. Should schools reduce focus on \
                traditional academic subjects to make room for more practical life skills?"
                .into(),
            author: "EducationReformer".into(),
            category: Category::Education,
            date: at("2025-05-02T15:20:00Z"),
            replies: vec![],
            user_id: None,
        },
    ]
}
