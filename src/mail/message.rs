//! Contact email formatting

use chrono::{DateTime, SecondsFormat, Utc};

use crate::config::MailConfig;
use crate::contact::ValidContact;

/// A formatted notification for one contact submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
    /// The submission the message was built from
    pub contact: ValidContact,
}

impl ContactEmail {
    /// Address a submission from the configured sender to the configured recipient
    pub fn compose(contact: ValidContact, mail: &MailConfig, submitted_at: DateTime<Utc>) -> Self {
        let subject = format!("New Contact Form Submission from {}", contact.name);
        let html = render_html(&contact, submitted_at);
        Self {
            from: mail.from.clone(),
            to: mail.to.clone(),
            subject,
            html,
            contact,
        }
    }
}

fn render_html(contact: &ValidContact, submitted_at: DateTime<Utc>) -> String {
    let mut html = String::from("<h2>New Contact Form Submission</h2>\n");
    html.push_str(&field("Name", &contact.name));
    html.push_str(&field("Email", &contact.email));
    if let Some(company) = &contact.company {
        html.push_str(&field("Company", company));
    }
    if let Some(expertise) = &contact.expertise {
        html.push_str(&field("Expertise Interest", expertise));
    }
    html.push_str("<p><strong>Message:</strong></p>\n");
    html.push_str(&format!(
        "<p>{}</p>\n",
        escape_html(&contact.message).replace('\n', "<br>")
    ));
    html.push_str("<hr>\n");
    html.push_str(&format!(
        "<p><small>Submitted at: {}</small></p>\n",
        submitted_at.to_rfc3339_opts(SecondsFormat::Millis, true)
    ));
    html
}

fn field(label: &str, value: &str) -> String {
    format!("<p><strong>{label}:</strong> {}</p>\n", escape_html(value))
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
