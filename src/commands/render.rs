//! Reports shared by the issue and pr commands.

use std::io::{self, Write};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::infra::gh::{Comment, Created, ItemState, RepoId, Review, TrackerItem};
use crate::shared::output::{DISPLAY_WIDTH, Render, Style};
use crate::shared::table::{color, ellipsize, pad_or_truncate};
use crate::shared::time::{format_relative_time, format_timestamp};

const LABEL_WIDTH: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Issue,
    PullRequest,
}

impl ItemKind {
    fn noun(self) -> &'static str {
        match self {
            Self::Issue => "issue",
            Self::PullRequest => "pull request",
        }
    }
}

/// `{url, number}` of a new issue or pull request.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct CreatedReport {
    pub created: Created,
    #[serde(skip)]
    pub kind: ItemKind,
    #[serde(skip)]
    pub repo: RepoId,
}

impl Render for CreatedReport {
    fn render_human(&self, w: &mut dyn Write, style: &Style) -> io::Result<()> {
        writeln!(
            w,
            "{} Created {} {} in {}",
            style.ok_mark(),
            self.kind.noun(),
            style.bold(&format!("#{}", self.created.number)),
            self.repo
        )?;
        writeln!(w, "  {}", self.created.url)
    }

    fn render_quiet(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(w, "{}", self.created.url)
    }
}

/// `{url}` of a new comment.
#[derive(Debug, Serialize)]
pub struct CommentReport {
    pub url: String,
    #[serde(skip)]
    pub kind: ItemKind,
    #[serde(skip)]
    pub number: u64,
}

impl Render for CommentReport {
    fn render_human(&self, w: &mut dyn Write, style: &Style) -> io::Result<()> {
        writeln!(
            w,
            "{} Commented on {} #{}",
            style.ok_mark(),
            self.kind.noun(),
            self.number
        )?;
        writeln!(w, "  {}", self.url)
    }

    fn render_quiet(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(w, "{}", self.url)
    }
}

/// A fetched issue or pull request. JSON is the item itself.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct ItemReport {
    pub item: TrackerItem,
    /// False under `--no-comments`; the human view then omits the section.
    #[serde(skip)]
    pub comments_requested: bool,
    #[serde(skip)]
    pub now: DateTime<Utc>,
}

fn state_parts(state: ItemState) -> (&'static str, &'static str) {
    match state {
        ItemState::Open => ("Open", color::GREEN),
        ItemState::Closed => ("Closed", color::RED),
        ItemState::Merged => ("Merged", color::MAGENTA),
    }
}

pub fn state_label(state: ItemState, style: &Style) -> String {
    let (text, code) = state_parts(state);
    style.paint(text, code)
}

/// State padded to `width` before colouring, so columns stay aligned.
pub fn state_cell(state: ItemState, width: usize, style: &Style) -> String {
    let (text, code) = state_parts(state);
    style.paint(&pad_or_truncate(text, width), code)
}

impl ItemReport {
    fn field(&self, w: &mut dyn Write, style: &Style, label: &str, value: &str) -> io::Result<()> {
        writeln!(w, "{} {}", style.dim(&pad_or_truncate(label, LABEL_WIDTH)), value)
    }

    fn render_reviews(&self, w: &mut dyn Write, style: &Style, reviews: &[Review]) -> io::Result<()> {
        writeln!(w)?;
        write!(w, "{}", style.section(&format!("Reviews ({})", reviews.len())))?;
        for review in reviews {
            writeln!(
                w,
                "  {} · {} · {}",
                style.bold(&review.author),
                review.state,
                format_relative_time(&review.submitted, self.now)
            )?;
            write_body(w, &review.body, "    ")?;
        }
        Ok(())
    }

    fn render_comments(&self, w: &mut dyn Write, style: &Style, comments: &[Comment]) -> io::Result<()> {
        writeln!(w)?;
        if comments.is_empty() {
            return writeln!(w, "{}", style.dim("No comments."));
        }
        write!(w, "{}", style.section(&format!("Comments ({})", comments.len())))?;
        for comment in comments {
            writeln!(
                w,
                "  {} · {}",
                style.bold(&comment.author),
                format_relative_time(&comment.created, self.now)
            )?;
            write_body(w, &comment.body, "    ")?;
        }
        Ok(())
    }
}

impl Render for ItemReport {
    fn render_human(&self, w: &mut dyn Write, style: &Style) -> io::Result<()> {
        let item = &self.item;
        write!(w, "{}", style.title(&format!("#{} {}", item.number, item.title)))?;

        self.field(w, style, "State", &state_label(item.state, style))?;
        self.field(w, style, "Author", &item.author)?;
        if !item.labels.is_empty() {
            self.field(w, style, "Labels", &item.labels.join(", "))?;
        }
        if !item.assignees.is_empty() {
            self.field(w, style, "Assignees", &item.assignees.join(", "))?;
        }
        if let Some(pull) = &item.pull {
            self.field(w, style, "Branches", &format!("{} ← {}", pull.base, pull.head))?;
            if pull.draft {
                self.field(w, style, "Draft", "yes")?;
            }
        }
        self.field(w, style, "Created", &format_timestamp(&item.created, self.now))?;
        self.field(w, style, "Updated", &format_timestamp(&item.updated, self.now))?;
        self.field(w, style, "URL", &item.url)?;

        writeln!(w)?;
        if item.body.trim().is_empty() {
            writeln!(w, "  {}", style.dim("No description provided."))?;
        } else {
            write_body(w, &item.body, "  ")?;
        }

        if let Some(pull) = &item.pull
            && !pull.reviews.is_empty()
        {
            self.render_reviews(w, style, &pull.reviews)?;
        }
        if self.comments_requested {
            self.render_comments(w, style, &item.comments)?;
        }
        Ok(())
    }

    /// `number<TAB>state<TAB>title<TAB>url`
    fn render_quiet(&self, w: &mut dyn Write) -> io::Result<()> {
        let item = &self.item;
        writeln!(
            w,
            "{}\t{}\t{}\t{}",
            item.number,
            item.state.as_str(),
            item.title,
            item.url
        )
    }
}

/// Free text, indented, each line cut to the display width.
fn write_body(w: &mut dyn Write, body: &str, indent: &str) -> io::Result<()> {
    let width = DISPLAY_WIDTH.saturating_sub(indent.len());
    for line in body.trim_end().lines() {
        let line = line.trim_end();
        if line.is_empty() {
            writeln!(w)?;
        } else {
            writeln!(w, "{indent}{}", ellipsize(line, width))?;
        }
    }
    Ok(())
}
