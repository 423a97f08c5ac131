//! Bulk protection of presentation material.

use indico_client::{Event, RegistrationForm};
use tracing::{debug, info};

use crate::error::{CrierError, Result};

/// Description added to every attachment this tool protects.
///
/// Shown on hover to everyone, including visitors who are not logged in.
pub const PROTECTION_MESSAGE: &str =
    "The organisers have restricted access to this material to registrants only";

/// Counters for one protection run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProtectReport {
    pub protected: usize,
    pub already_protected: usize,
}

/// Restrict all unprotected attachments in the event to registrants.
///
/// Walks every folder of every contribution and marks each unprotected
/// attachment as protected, with an ACL naming the event's registration
/// form and a description telling visitors why access is restricted.
///
/// # Errors
///
/// Returns an error if the event does not have exactly one registration
/// form, or if any Indico request fails. A failed update aborts the run.
pub async fn protect_event_material(event: &Event) -> Result<ProtectReport> {
    let sessions = event.get_sessions().await?;
    let forms = event.get_registration_forms().await?;
    let registrant_acl = single_registration_identifier(&forms)?;

    let acl = serde_json::to_string(&[registrant_acl.as_str()])
        .map_err(|e| CrierError::Protect(format!("failed to encode ACL: {e}")))?;

    let mut report = ProtectReport::default();
    for session in &sessions {
        for contribution in &session.contributions {
            for folder in &contribution.folders {
                debug!("contribution: {}, folder: {}", contribution.url, folder.id);

                for attachment in &folder.attachments {
                    if attachment.is_protected {
                        report.already_protected += 1;
                        continue;
                    }
                    if !attachment.description.is_empty() {
                        debug!("keeping existing description: {}", attachment.description);
                    }

                    let filename = if attachment.filename.is_empty() {
                        "NONE"
                    } else {
                        attachment.filename.as_str()
                    };
                    info!("protecting {filename} with ACL '{registrant_acl}'");

                    event
                        .update_attachment(
                            attachment,
                            &[
                                ("description", protected_description(&attachment.description)),
                                ("protected", "y".to_owned()),
                                ("acl", acl.clone()),
                            ],
                        )
                        .await?;
                    report.protected += 1;
                }
            }
        }
    }
    Ok(report)
}

fn single_registration_identifier(forms: &[RegistrationForm]) -> Result<String> {
    match forms {
        [] => Err(CrierError::Protect(
            "no registration forms returned".to_owned(),
        )),
        [form] => Ok(form.identifier.clone()),
        _ => {
            let identifiers: Vec<&str> = forms.iter().map(|f| f.identifier.as_str()).collect();
            Err(CrierError::Protect(format!(
                "found {} registration forms, expected exactly one: {}",
                forms.len(),
                identifiers.join(", ")
            )))
        }
    }
}

fn protected_description(existing: &str) -> String {
    if existing.is_empty() {
        PROTECTION_MESSAGE.to_owned()
    } else {
        format!("{existing}.\n\n{PROTECTION_MESSAGE}")
    }
}
