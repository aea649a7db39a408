//! Read-only projection of store state into renderable strings.
//!
//! Everything here is a pure function of a store snapshot: no locks, no
//! I/O, no clocks beyond formatting the timestamps already recorded. The
//! actual rendering toolkit is out of scope; these functions produce the
//! list rows and transcript markup it displays.

use chrono::{Local, TimeZone};

use crate::persistence::{Conversation, DialogMap};

/// Label for operator-authored transcript lines.
const OPERATOR_LABEL: &str = "You";

/// One row of the conversation list, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationRow {
    pub user_id: i64,
    /// Display label: name on the first line, id in parentheses below.
    pub label: String,
    /// True while the operator owes this user a reply; drives row coloring.
    pub needs_reply: bool,
}

/// Project the store snapshot into conversation list rows, in store order.
pub fn conversation_rows(dialogs: &DialogMap) -> Vec<ConversationRow> {
    dialogs
        .values()
        .map(|convo| ConversationRow {
            user_id: convo.user_id,
            label: row_label(convo),
            needs_reply: !convo.answered,
        })
        .collect()
}

fn row_label(convo: &Conversation) -> String {
    let name = match convo.last_name.as_deref() {
        Some(last) if !last.is_empty() => format!("{} {}", convo.first_name, last),
        _ => convo.first_name.clone(),
    };
    format!("{}\n({})", name, convo.user_id)
}

/// Render a conversation's full transcript as display markup.
///
/// One line per message: `[HH:MM dd.mm.yy] <b>Name:</b> text`, joined with
/// `<br>`. Inbound lines carry the remote first name, outbound lines the
/// fixed operator label. Names and text are HTML-escaped and embedded
/// newlines are flattened to spaces.
pub fn render_transcript(convo: &Conversation) -> String {
    let lines: Vec<String> = convo
        .messages
        .iter()
        .map(|msg| {
            let who = if msg.inbound {
                escape_html(&convo.first_name)
            } else {
                OPERATOR_LABEL.to_string()
            };
            format!(
                "[{}] <b>{}:</b> {}",
                format_message_time(msg.time),
                who,
                escape_html(&msg.text.replace('\n', " "))
            )
        })
        .collect();

    lines.join("<br>")
}

/// Format an epoch timestamp for transcript lines, in local time.
fn format_message_time(epoch: i64) -> String {
    match Local.timestamp_opt(epoch, 0).single() {
        Some(dt) => dt.format("%H:%M %d.%m.%y").to_string(),
        // Out-of-range timestamps render raw rather than panicking.
        None => format!("t={epoch}"),
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::Message;

    fn make_conversation(first_name: &str, last_name: Option<&str>) -> Conversation {
        Conversation {
            user_id: 42,
            username: None,
            first_name: first_name.to_string(),
            last_name: last_name.map(|s| s.to_string()),
            messages: vec![
                Message {
                    text: "hi".to_string(),
                    time: 1000,
                    inbound: true,
                },
                Message {
                    text: "hello".to_string(),
                    time: 1005,
                    inbound: false,
                },
            ],
            answered: true,
        }
    }

    mod rows {
        use super::*;

        #[test]
        fn row_label_includes_both_names_and_id() {
            let mut dialogs = DialogMap::new();
            dialogs.insert("42".to_string(), make_conversation("Ana", Some("B")));

            let rows = conversation_rows(&dialogs);
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].label, "Ana B\n(42)");
        }

        #[test]
        fn missing_last_name_is_omitted() {
            let mut dialogs = DialogMap::new();
            dialogs.insert("42".to_string(), make_conversation("Ana", None));

            let rows = conversation_rows(&dialogs);
            assert_eq!(rows[0].label, "Ana\n(42)");
        }

        #[test]
        fn needs_reply_mirrors_answered_flag() {
            let mut answered = make_conversation("Ana", None);
            answered.answered = true;
            let mut pending = make_conversation("Ben", None);
            pending.user_id = 7;
            pending.answered = false;

            let mut dialogs = DialogMap::new();
            dialogs.insert("42".to_string(), answered);
            dialogs.insert("7".to_string(), pending);

            let rows = conversation_rows(&dialogs);
            let by_id = |id: i64| rows.iter().find(|r| r.user_id == id).unwrap();
            assert!(!by_id(42).needs_reply);
            assert!(by_id(7).needs_reply);
        }

        #[test]
        fn empty_store_yields_no_rows() {
            assert!(conversation_rows(&DialogMap::new()).is_empty());
        }
    }

    mod transcript {
        use super::*;

        #[test]
        fn attributes_lines_by_direction() {
            let transcript = render_transcript(&make_conversation("Ana", None));
            let lines: Vec<&str> = transcript.split("<br>").collect();

            assert_eq!(lines.len(), 2);
            assert!(lines[0].contains("<b>Ana:</b> hi"));
            assert!(lines[1].contains("<b>You:</b> hello"));
        }

        #[test]
        fn escapes_markup_in_text_and_name() {
            let mut convo = make_conversation("A<na>", None);
            convo.messages[0].text = "1 < 2 & \"so\"".to_string();

            let transcript = render_transcript(&convo);
            assert!(transcript.contains("A&lt;na&gt;"));
            assert!(transcript.contains("1 &lt; 2 &amp; &quot;so&quot;"));
            assert!(!transcript.contains("<na>"));
        }

        #[test]
        fn flattens_embedded_newlines() {
            let mut convo = make_conversation("Ana", None);
            convo.messages[0].text = "line one\nline two".to_string();

            let transcript = render_transcript(&convo);
            assert!(transcript.contains("line one line two"));
        }

        #[test]
        fn each_line_carries_a_timestamp() {
            let transcript = render_transcript(&make_conversation("Ana", None));
            for line in transcript.split("<br>") {
                assert!(line.starts_with('['), "line missing timestamp: {line}");
            }
        }
    }
}
