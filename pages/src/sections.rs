//! Ordered table of the decision-compass result sections.
//!
//! Every row pairs a presence test with a renderer. A section whose test fails
//! contributes nothing, not even its heading.

use std::fmt::Write;

use ashram_core::{non_empty, CompassContent, InputEcho, InnerPractice, VerseEntry};

use crate::html::{escape, multiline};

/// Label on the per-verse follow-up control
pub const DEEPER_EXPLANATION_LABEL: &str = "Ask for a deeper explanation of this verse";

/// One result section
pub struct Section {
    pub name: &'static str,
    pub present: fn(&CompassContent) -> bool,
    pub render: fn(&CompassContent, &mut String),
}

pub const SECTIONS: &[Section] = &[
    Section {
        name: "summary",
        present: |c| non_empty(&c.summary).is_some(),
        render: render_summary,
    },
    Section {
        name: "situation",
        present: |c| echoed_situation(c).is_some(),
        render: render_situation,
    },
    Section {
        name: "context",
        present: |c| !context_rows(c).is_empty(),
        render: render_context,
    },
    Section {
        name: "lens",
        present: |c| !c.gita_lens.is_empty(),
        render: render_lens,
    },
    Section {
        name: "verses",
        present: |c| !c.verses.is_empty(),
        render: render_verses,
    },
    Section {
        name: "action_plan",
        present: |c| !c.action_plan.is_empty(),
        render: render_action_plan,
    },
    Section {
        name: "inner_practice",
        present: |c| c.inner_practice.as_ref().is_some_and(has_practice),
        render: render_inner_practice,
    },
    Section {
        name: "reflection",
        present: |c| !c.reflection_questions.is_empty(),
        render: render_reflection,
    },
];

/// Renders every present section in table order; returns the HTML and the names emitted.
pub fn render(content: &CompassContent) -> (String, Vec<&'static str>) {
    let mut out = String::new();
    let mut emitted = Vec::new();
    for section in SECTIONS {
        if (section.present)(content) {
            (section.render)(content, &mut out);
            emitted.push(section.name);
        }
    }
    (out, emitted)
}

/// Echoed situation, trimmed, if there is one
pub fn echoed_situation(content: &CompassContent) -> Option<&str> {
    content
        .input_echo
        .as_ref()
        .and_then(|echo| non_empty(&echo.situation))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn context_rows(content: &CompassContent) -> Vec<(&'static str, &str)> {
    let Some(echo) = &content.input_echo else {
        return Vec::new();
    };
    let InputEcho {
        life_area,
        emotion,
        desired_outcome,
        constraints,
        ..
    } = echo;

    [
        ("Life area", life_area),
        ("Emotion", emotion),
        ("Desired outcome", desired_outcome),
        ("Constraints", constraints),
    ]
    .into_iter()
    .filter_map(|(label, value)| non_empty(value).map(|v| (label, v)))
    .collect()
}

fn has_practice(practice: &InnerPractice) -> bool {
    non_empty(&practice.title).is_some()
        || non_empty(&practice.duration).is_some()
        || non_empty(&practice.instructions).is_some()
}

fn open_section(out: &mut String, class: &str, heading: &str) {
    let _ = write!(out, "<div class=\"{}\">\n<h4>{}</h4>\n", class, heading);
}

fn close_section(out: &mut String) {
    out.push_str("</div>\n");
}

fn list(out: &mut String, tag: &str, items: &[String]) {
    let _ = writeln!(out, "<{}>", tag);
    for item in items {
        let _ = writeln!(out, "<li>{}</li>", escape(item));
    }
    let _ = writeln!(out, "</{}>", tag);
}

fn render_summary(content: &CompassContent, out: &mut String) {
    let summary = non_empty(&content.summary).unwrap_or_default();
    open_section(out, "dc-section", "1. Summary");
    let _ = writeln!(out, "<p>{}</p>", escape(summary));
    close_section(out);
}

fn render_situation(content: &CompassContent, out: &mut String) {
    let situation = echoed_situation(content).unwrap_or_default();
    open_section(out, "dc-section dc-section-muted", "Your Situation (as heard)");
    let _ = writeln!(out, "<p>{}</p>", escape(situation));
    close_section(out);
}

fn render_context(content: &CompassContent, out: &mut String) {
    open_section(out, "dc-section dc-section-meta", "Context Snapshot");
    out.push_str("<ul>\n");
    for (label, value) in context_rows(content) {
        let _ = writeln!(out, "<li><strong>{}:</strong> {}</li>", label, escape(value));
    }
    out.push_str("</ul>\n");
    close_section(out);
}

fn render_lens(content: &CompassContent, out: &mut String) {
    open_section(out, "dc-section", "2. Gita Lens on Your Dilemma");
    list(out, "ul", &content.gita_lens);
    close_section(out);
}

fn render_verses(content: &CompassContent, out: &mut String) {
    open_section(out, "dc-section", "3. Supporting Verses");
    out.push_str("<ul class=\"dc-verses\">\n");
    for (index, verse) in content.verses.iter().enumerate() {
        render_verse(index, verse, out);
    }
    out.push_str("</ul>\n");
    close_section(out);
}

fn render_verse(index: usize, verse: &VerseEntry, out: &mut String) {
    out.push_str("<li>\n");

    if let Some(reference) = non_empty(&verse.reference) {
        let _ = writeln!(out, "<p><strong>{}</strong></p>", escape(reference));
    }
    if let Some(dev) = non_empty(&verse.devanagari) {
        let _ = writeln!(out, "<p class=\"dc-verse-devanagari\">{}</p>", multiline(dev));
    }
    if let Some(translit) = non_empty(&verse.transliteration) {
        let _ = writeln!(out, "<p class=\"dc-verse-translit\"><em>{}</em></p>", multiline(translit));
    }
    if let Some(en) = non_empty(&verse.en_translation) {
        let _ = writeln!(out, "<p class=\"dc-verse-en\">{}</p>", escape(en));
    }
    if let Some(hi) = non_empty(&verse.hi_translation) {
        let _ = writeln!(out, "<p class=\"dc-verse-hi\">{}</p>", escape(hi));
    }
    if let Some(excerpt) = non_empty(&verse.excerpt) {
        let _ = writeln!(out, "<p class=\"dc-verse-excerpt\">{}</p>", escape(excerpt));
    }
    if let Some(why) = non_empty(&verse.why_relevant) {
        let _ = writeln!(out, "<p class=\"dc-verse-note\"><em>{}</em></p>", escape(why));
    }

    let _ = writeln!(
        out,
        "<button type=\"button\" class=\"dc-more-explanation-btn\" data-verse-index=\"{}\" data-verse-ref=\"{}\">{}</button>",
        index,
        escape(non_empty(&verse.reference).unwrap_or_default()),
        DEEPER_EXPLANATION_LABEL
    );
    out.push_str("</li>\n");
}

fn render_action_plan(content: &CompassContent, out: &mut String) {
    open_section(out, "dc-section", "4. Suggested 3-Step Action Plan");
    list(out, "ol", &content.action_plan);
    close_section(out);
}

fn render_inner_practice(content: &CompassContent, out: &mut String) {
    let Some(practice) = &content.inner_practice else {
        return;
    };
    let title = non_empty(&practice.title).unwrap_or("Inner Practice");

    open_section(out, "dc-section", "5. Inner Practice");
    let _ = write!(out, "<p><strong>{}</strong>", escape(title));
    if let Some(duration) = non_empty(&practice.duration) {
        let _ = write!(out, " ({})", escape(duration));
    }
    out.push_str("</p>\n");
    if let Some(instructions) = non_empty(&practice.instructions) {
        let _ = writeln!(out, "<p>{}</p>", multiline(instructions));
    }
    close_section(out);
}

fn render_reflection(content: &CompassContent, out: &mut String) {
    open_section(out, "dc-section", "6. Reflection Questions");
    list(out, "ul", &content.reflection_questions);
    close_section(out);
}
