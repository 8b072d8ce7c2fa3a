//! ANSI renderer: clears the screen and redraws each view.

use std::io::Write;

use crate::core::item::{Answer, Item, ItemKind, SingleSelection, YesNoSelection};
use crate::render::output::{OutputGate, TerminalCmd};
use crate::render::text::{display_width, pad_to_width, truncate_to_width, wrap_words};
use crate::render::{
    answer_status, describe_answer, format_elapsed, ItemView, PresentationSink, PromptView,
    SummaryView,
};

const BOX_MIN_WIDTH: usize = 30;
const BOX_MAX_WIDTH: usize = 76;
const QUESTION_COLUMN_WIDTH: usize = 40;

const BOLD: &str = "1";
const DIM: &str = "2";
const RED: &str = "31";
const GREEN: &str = "32";
const YELLOW: &str = "33";
const BLUE: &str = "34";
const MAGENTA: &str = "35";
const CYAN: &str = "36";

/// Redraws whole views onto a byte sink (stdout in the binary).
pub struct AnsiRenderer<W: Write> {
    out: W,
    color: bool,
    gate: OutputGate,
}

impl<W: Write> AnsiRenderer<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self {
            out,
            color,
            gate: OutputGate::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Leaves the screen as-is with the cursor visible on a fresh line.
    pub fn finish(&mut self) -> std::io::Result<()> {
        self.gate.push(TerminalCmd::ShowCursor);
        self.gate.push(TerminalCmd::line(""));
        self.gate.flush(&mut self.out)
    }

    fn paint(&self, codes: &[&str], text: &str) -> String {
        if !self.color || codes.is_empty() || text.is_empty() {
            return text.to_string();
        }
        format!("\x1b[{}m{text}\x1b[0m", codes.join(";"))
    }

    fn line(&mut self, text: impl Into<String>) {
        self.gate.push(TerminalCmd::line(text));
    }

    fn flush(&mut self) {
        if let Err(err) = self.gate.flush(&mut self.out) {
            tracing::warn!(error = %err, "failed to write to terminal");
            self.gate.clear();
        }
    }

    fn push_box(&mut self, title: &str, subtitle: Option<&str>, body: &[String], border: &str) {
        let content_width = body
            .iter()
            .map(|line| display_width(line))
            .max()
            .unwrap_or(0)
            .clamp(BOX_MIN_WIDTH, BOX_MAX_WIDTH - 4);
        let inner = content_width + 2;

        let title = format!(" {title} ");
        let top_fill = inner.saturating_sub(display_width(&title) + 1);
        let top = format!("╭─{title}{}╮", "─".repeat(top_fill));
        self.line(self.paint(&[border], &top));

        for text in body {
            let row = format!("│ {} │", pad_to_width(text, content_width));
            self.line(self.paint(&[border], &row));
        }

        let bottom = match subtitle {
            Some(subtitle) => {
                let subtitle = format!(" {subtitle} ");
                let fill = inner.saturating_sub(display_width(&subtitle) + 1);
                format!("╰{}{subtitle}─╯", "─".repeat(fill))
            }
            None => format!("╰{}╯", "─".repeat(inner)),
        };
        self.line(self.paint(&[border], &bottom));
    }

    fn push_option_row(&mut self, key: &str, label: &str, selected: bool) {
        let row = if selected {
            format!(
                "  {} {}  {}",
                self.paint(&[BOLD, GREEN], key),
                self.paint(&[BOLD, GREEN], "✓"),
                self.paint(&[BOLD, GREEN], label)
            )
        } else {
            format!(
                "  {}    {}",
                self.paint(&[BOLD], key),
                self.paint(&[DIM], label)
            )
        };
        self.line(row);
    }

    fn push_options(&mut self, item: &Item) {
        match item.answer() {
            Answer::Single(selection) => {
                for (offset, option) in item.options().iter().enumerate() {
                    let index = offset + 1;
                    let selected = matches!(selection, Some(SingleSelection::Option(chosen)) if *chosen == index);
                    self.push_option_row(&index.to_string(), option, selected);
                }
                match selection {
                    Some(SingleSelection::Other(text)) => {
                        self.push_option_row("0", &format!("Other: {text}"), true)
                    }
                    _ => self.push_option_row("0", "Other (specify)", false),
                }
            }
            Answer::Multi(selected) => {
                for (offset, option) in item.options().iter().enumerate() {
                    let index = offset + 1;
                    self.push_option_row(&index.to_string(), option, selected.contains(&index));
                }
            }
            Answer::YesNo(selection) => {
                let yes = item.yes_no_label(1).to_string();
                let no = item.yes_no_label(2).to_string();
                self.push_option_row("1", &yes, matches!(selection, Some(YesNoSelection::Yes)));
                self.push_option_row("2", &no, matches!(selection, Some(YesNoSelection::No)));
                match selection {
                    Some(YesNoSelection::Other(text)) => {
                        self.push_option_row("3", &format!("Other: {text}"), true)
                    }
                    _ => self.push_option_row("3", "Other (specify)", false),
                }
            }
        }
    }

    fn instructions(&self, item: &Item) -> String {
        let count = item.options().len();
        match item.answer() {
            Answer::Single(Some(selection)) => format!(
                "{} {}",
                self.paint(&[GREEN], &format!("Selected: {}", selection.selected_index())),
                self.paint(&[DIM], "- Press Enter to confirm")
            ),
            Answer::Single(None) => self.paint(
                &[DIM],
                &format!("Press number key (0-{count}) to select, Enter to confirm"),
            ),
            Answer::Multi(selected) => {
                let status = if selected.is_empty() {
                    self.paint(&[DIM], "No selections")
                } else {
                    self.paint(&[GREEN], &format!("{} selected", selected.len()))
                };
                format!(
                    "{} {status}",
                    self.paint(
                        &[DIM],
                        &format!("Press number keys (1-{count}) to toggle, Enter to confirm:")
                    )
                )
            }
            Answer::YesNo(Some(_)) => format!(
                "{} {}",
                self.paint(
                    &[GREEN],
                    &format!("Selected: {}", describe_answer(item).unwrap_or_default())
                ),
                self.paint(&[DIM], "- Press Enter to confirm")
            ),
            Answer::YesNo(None) => self.paint(
                &[DIM],
                "Press 1 (Yes), 2 (No), 3 (Other), then Enter to confirm",
            ),
        }
    }
}

impl<W: Write> PresentationSink for AnsiRenderer<W> {
    fn render_item(&mut self, view: &ItemView<'_>) {
        let item = view.item;
        self.gate.push(TerminalCmd::ClearScreen);
        self.gate.push(TerminalCmd::HideCursor);

        let status = match answer_status(item) {
            Some(status) => self.paint(&[GREEN], &format!("✓ {status}")),
            None => self.paint(&[YELLOW], "○ Not answered"),
        };
        self.line("");
        self.line(format!(
            "{} {} {status}",
            self.paint(
                &[BOLD, CYAN],
                &format!("Question {} of {}", view.position, view.total)
            ),
            self.paint(&[DIM], &format!("[{}]", item.kind().label())),
        ));
        self.line("");

        let body = wrap_words(item.prompt(), BOX_MAX_WIDTH - 4);
        self.push_box("Question", Some(item.kind().label()), &body, BLUE);
        self.line("");
        self.push_options(item);
        self.line("");

        let instructions = self.instructions(item);
        self.line(instructions);

        let mut hints = Vec::new();
        if view.hints.previous {
            hints.push("← = previous");
        }
        if view.hints.next {
            hints.push("→ = next");
        }
        hints.extend(["'j' = jump", "'s' = summary", "'q' = quit"]);
        self.line(self.paint(&[DIM], &hints.join("  ")));

        if let Some(notice) = view.notice {
            self.line("");
            self.line(self.paint(&[RED], &notice.to_string()));
        }
        self.flush();
    }

    fn render_summary(&mut self, view: &SummaryView<'_>) {
        self.gate.push(TerminalCmd::ClearScreen);
        self.gate.push(TerminalCmd::HideCursor);

        let body = vec![
            format!("Total Questions: {}", view.items.len()),
            format!("Answered: {}", view.answered),
            format!("Time: {}", format_elapsed(view.elapsed)),
        ];
        self.push_box("Summary", None, &body, CYAN);
        self.line("");

        if view.answered > 0 {
            self.line(self.paint(&[BOLD], "Your Answers"));
            let header = format!(
                "{} {} {} {}",
                pad_to_width("#", 4),
                pad_to_width("Type", 14),
                pad_to_width("Question", QUESTION_COLUMN_WIDTH),
                "Answer"
            );
            self.line(self.paint(&[BOLD, MAGENTA], &header));

            for (offset, item) in view.items.iter().enumerate() {
                let Some(answer) = describe_answer(item) else {
                    continue;
                };
                let question =
                    truncate_to_width(item.prompt(), QUESTION_COLUMN_WIDTH, "...");
                let feedback = match item.matches_reference() {
                    Some(true) if item.kind() == ItemKind::SingleChoice => {
                        format!("  {}", self.paint(&[GREEN], "(correct)"))
                    }
                    Some(false) if item.kind() == ItemKind::SingleChoice => {
                        format!("  {}", self.paint(&[RED], "(incorrect)"))
                    }
                    _ => String::new(),
                };
                self.line(format!(
                    "{} {} {} {}{feedback}",
                    self.paint(&[CYAN], &pad_to_width(&(offset + 1).to_string(), 4)),
                    self.paint(&[DIM], &pad_to_width(item.kind().label(), 14)),
                    pad_to_width(&question, QUESTION_COLUMN_WIDTH),
                    self.paint(&[YELLOW], &answer),
                ));
            }
            self.line("");
        }

        self.line(self.paint(
            &[DIM],
            "Press any key to return to the questions, 'q' to quit",
        ));
        self.flush();
    }

    fn render_prompt(&mut self, view: &PromptView<'_>) {
        self.gate.push(TerminalCmd::ClearLine);
        if let Some(notice) = view.notice {
            self.gate
                .push(TerminalCmd::bytes(format!("{} ", self.paint(&[RED], &notice.to_string()))));
        }
        self.gate.push(TerminalCmd::bytes(format!(
            "{}: {}",
            self.paint(&[BOLD], view.label),
            view.text
        )));
        self.gate.push(TerminalCmd::ShowCursor);
        self.flush();
    }
}
