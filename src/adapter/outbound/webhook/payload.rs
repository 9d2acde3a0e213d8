//! Embed payload sent to alert webhooks.

use serde::Serialize;

use crate::domain::stats::HISTORY_TIME_FORMAT;
use crate::port::outbound::notifier::Alert;

/// Presentation settings shared by every alert.
#[derive(Debug, Clone)]
pub struct EmbedStyle {
    pub title: String,
    pub color: u32,
    /// Join page; `placeId` and `gameInstanceId` are appended as query params.
    pub join_url_base: String,
}

impl Default for EmbedStyle {
    fn default() -> Self {
        Self {
            title: "Charizard Notifier".to_string(),
            color: 16_753_920,
            join_url_base: "https://chillihub1.github.io/chillihub-joiner/".to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WebhookPayload {
    pub embeds: Vec<Embed>,
    pub components: Vec<ActionRow>,
}

#[derive(Debug, Serialize)]
pub struct Embed {
    pub title: String,
    pub color: u32,
    pub fields: Vec<EmbedField>,
    pub footer: EmbedFooter,
}

#[derive(Debug, Serialize)]
pub struct EmbedField {
    pub name: &'static str,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Serialize)]
pub struct EmbedFooter {
    pub text: String,
}

/// Component row (`type` 1) holding link buttons.
#[derive(Debug, Serialize)]
pub struct ActionRow {
    #[serde(rename = "type")]
    pub kind: u8,
    pub components: Vec<LinkButton>,
}

/// Link button: component `type` 2, `style` 5.
#[derive(Debug, Serialize)]
pub struct LinkButton {
    #[serde(rename = "type")]
    pub kind: u8,
    pub style: u8,
    pub label: &'static str,
    pub url: String,
}

/// Join page URL for a server instance.
#[must_use]
pub fn join_url(base: &str, place_id: &str, job_id: &str) -> String {
    format!(
        "{base}?placeId={}&gameInstanceId={}",
        urlencoding::encode(place_id),
        urlencoding::encode(job_id)
    )
}

/// Lua snippet that teleports the local player into the instance.
#[must_use]
pub fn teleport_script(place_id: &str, job_id: &str) -> String {
    format!(
        "local TeleportService = game:GetService('TeleportService')\n\
         local Players = game:GetService('Players')\n\
         TeleportService:TeleportToPlaceInstance({place_id}, '{job_id}', Players.LocalPlayer)"
    )
}

fn code_block(value: &str, fallback: &str) -> String {
    let value = if value.is_empty() { fallback } else { value };
    format!("```{value}```")
}

impl WebhookPayload {
    #[must_use]
    pub fn for_alert(alert: &Alert, style: &EmbedStyle) -> Self {
        let join = join_url(&style.join_url_base, &alert.place_id, &alert.job_id);
        let script = teleport_script(&alert.place_id, &alert.job_id);

        let fields = vec![
            EmbedField {
                name: "Name",
                value: code_block(&alert.name, "Unknown"),
                inline: true,
            },
            EmbedField {
                name: "Generation",
                value: code_block(&alert.generation, "0"),
                inline: true,
            },
            EmbedField {
                name: "Rarity",
                value: code_block(&alert.rarity, "Unknown"),
                inline: true,
            },
            EmbedField {
                name: "JOB ID",
                value: format!("```{}```", alert.job_id),
                inline: false,
            },
            EmbedField {
                name: "Join Link",
                value: format!("[**Join**]({join})"),
                inline: false,
            },
            EmbedField {
                name: "Teleport Script",
                value: format!("```lua\n{script}\n```"),
                inline: false,
            },
        ];

        Self {
            embeds: vec![Embed {
                title: style.title.clone(),
                color: style.color,
                fields,
                footer: EmbedFooter {
                    text: format!(
                        "Detected at {}",
                        alert.detected_at.format(HISTORY_TIME_FORMAT)
                    ),
                },
            }],
            components: vec![ActionRow {
                kind: 1,
                components: vec![LinkButton {
                    kind: 2,
                    style: 5,
                    label: "Join",
                    url: join,
                }],
            }],
        }
    }
}
