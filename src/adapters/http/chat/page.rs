//! Server-rendered chat page.
//!
//! One HTML document: transcript bubbles, the message form while the session
//! accepts input, the rating form once it has ended, and the thank-you banner
//! on the render right after feedback is recorded.

use crate::application::SessionController;
use crate::domain::conversation::Role;
use crate::domain::session::{FeedbackRating, SessionState};

pub const PAGE_TITLE: &str = "Mind Haven Counseling Chatbot";
pub const WELCOME_LINE: &str = "Welcome! Share your thoughts, and we'll provide empathetic guidance.";
pub const THANK_YOU_LINE: &str = "Thank you for your feedback! It helps us improve.";

/// Renders the page for the session's current state.
pub fn render(session: &SessionController, show_thank_you: bool) -> String {
    let mut body = String::new();

    if show_thank_you {
        body.push_str(&format!(
            r#"<div class="banner success">{}</div>"#,
            THANK_YOU_LINE
        ));
    }

    body.push_str(r#"<div class="chat-container">"#);
    for turn in session.all_turns() {
        let (row, bubble) = match turn.role() {
            Role::User => ("chat-row row-reverse", "chat-bubble human-bubble"),
            Role::Assistant => ("chat-row", "chat-bubble ai-bubble"),
        };
        body.push_str(&format!(
            r#"<div class="{}"><div class="{}">{}</div></div>"#,
            row,
            bubble,
            html_escape(turn.text())
        ));
    }
    body.push_str("</div>");

    match session.state() {
        SessionState::AwaitingInput | SessionState::Processing => {
            body.push_str(MESSAGE_FORM);
            body.push_str(END_FORM);
        }
        SessionState::SessionEnded => {
            match session.feedback() {
                None => body.push_str(&feedback_form()),
                Some(rating) => body.push_str(&format!(
                    r#"<div class="feedback-container"><p>Your rating: {}</p></div>"#,
                    rating.label()
                )),
            }
            body.push_str(NEW_CHAT_FORM);
        }
        SessionState::Idle => body.push_str(NEW_CHAT_FORM),
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<style>{css}</style>
</head>
<body>
<h1>{title}</h1>
<p class="welcome">{welcome}</p>
{body}
</body>
</html>"#,
        title = PAGE_TITLE,
        css = PAGE_CSS,
        welcome = WELCOME_LINE,
        body = body
    )
}

fn feedback_form() -> String {
    let options: String = FeedbackRating::ALL
        .iter()
        .map(|rating| {
            format!(
                r#"<label><input type="radio" name="rating" value="{0}" required> {0}</label><br>"#,
                rating.label()
            )
        })
        .collect();

    format!(
        r#"<div class="feedback-container"><h3>Did you find the chat helpful?</h3><form method="post" action="/chat/feedback"><p>Rate your experience:</p>{}<button class="submit-button" type="submit">Submit</button></form></div>"#,
        options
    )
}

const MESSAGE_FORM: &str = r#"<form class="input-area" method="post" action="/chat/message"><input type="text" name="text" placeholder="Share your thoughts with me..." autocomplete="off" autofocus><button class="submit-button" type="submit">Send</button></form>"#;

const END_FORM: &str = r#"<form method="post" action="/chat/end"><button class="submit-button" type="submit">End Chat</button></form>"#;

const NEW_CHAT_FORM: &str = r#"<form method="post" action="/chat/new"><button class="submit-button" type="submit">Start a new chat</button></form>"#;

/// Escape HTML special characters.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

const PAGE_CSS: &str = r#"
body { background-color: #FAF3F3; font-family: "Source Sans Pro", sans-serif; }
h1, .welcome { text-align: center; }
.chat-container { max-width: 700px; margin: auto; padding: 5px; border: 1px solid #e6e6e6; border-radius: 15px; background-color: #FFFDFD; box-shadow: 0px 4px 8px rgba(0, 0, 0, 0.1); }
.chat-row { display: flex; margin: 5px; }
.row-reverse { flex-direction: row-reverse; }
.chat-bubble { padding: 10px 15px; margin: 0px 7px; max-width: 70%; font-size: 15px; white-space: pre-wrap; }
.ai-bubble { background: rgb(240, 242, 246); border-radius: 10px; }
.human-bubble { background: linear-gradient(135deg, rgb(0, 178, 255) 0%, rgb(0, 106, 255) 100%); color: white; border-radius: 20px; }
.input-area, form { max-width: 700px; margin: 20px auto 0; display: block; }
.input-area input { width: 75%; padding: 8px; }
.feedback-container { max-width: 700px; margin: 20px auto 0; padding: 5px; border: 1px solid #E0E0E0; border-radius: 10px; background-color: #FFFCF9; }
.submit-button { background-color: #F28A8A; color: white; border: none; padding: 8px 16px; border-radius: 8px; font-size: 16px; cursor: pointer; margin-top: 10px; }
.submit-button:hover { background-color: #FF6B6B; }
.banner.success { max-width: 700px; margin: 10px auto; padding: 10px; border-radius: 8px; background: #E6F4EA; color: #1E7B34; }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockAIProvider;
    use crate::adapters::sentiment::MockClassifier;
    use crate::application::{SessionFactory, SessionSettings};
    use std::sync::Arc;

    fn open_session(reply: &str) -> SessionController {
        SessionFactory::new(
            Arc::new(MockClassifier::new()),
            Arc::new(MockAIProvider::new().with_response(reply)),
            SessionSettings::default(),
        )
        .open()
    }

    #[test]
    fn html_escape_escapes_special_chars() {
        assert_eq!(html_escape("<script>"), "&lt;script&gt;");
        assert_eq!(html_escape("a & b"), "a &amp; b");
        assert_eq!(html_escape("\"quoted\""), "&quot;quoted&quot;");
        assert_eq!(html_escape("it's"), "it&#39;s");
    }

    #[test]
    fn fresh_page_has_title_welcome_and_message_form() {
        let html = render(&open_session("hi"), false);

        assert!(html.contains("<title>Mind Haven Counseling Chatbot</title>"));
        assert!(html.contains(WELCOME_LINE));
        assert!(html.contains(r#"action="/chat/message""#));
        assert!(html.contains("End Chat"));
        assert!(!html.contains(THANK_YOU_LINE));
    }

    #[tokio::test]
    async fn transcript_text_is_escaped() {
        let mut session = open_session("<b>bold</b> reply");
        session.submit_text("<script>alert(1)</script>").await.unwrap();

        let html = render(&session, false);

        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("&lt;b&gt;bold&lt;/b&gt; reply"));
        assert!(html.contains("human-bubble"));
        assert!(html.contains("ai-bubble"));
    }

    #[test]
    fn ended_session_offers_rating_form() {
        let mut session = open_session("hi");
        session.end_session().unwrap();

        let html = render(&session, false);

        assert!(html.contains("Did you find the chat helpful?"));
        for rating in FeedbackRating::ALL {
            assert!(html.contains(&format!(r#"value="{}""#, rating.label())));
        }
        assert!(!html.contains(r#"action="/chat/message""#));
    }

    #[test]
    fn thank_you_banner_only_when_requested() {
        let mut session = open_session("hi");
        session.end_session().unwrap();
        session.submit_feedback(FeedbackRating::Satisfied).unwrap();

        let html = render(&session, true);
        assert!(html.contains(THANK_YOU_LINE));
        assert!(html.contains("Your rating: Satisfied"));
        assert!(!html.contains("Did you find the chat helpful?"));

        assert!(!render(&session, false).contains(THANK_YOU_LINE));
    }
}
