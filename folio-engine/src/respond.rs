//! Response templating: one formatter per category, plus the canned
//! fallback, quick-reply, and suggestion tables.

use folio_knowledge::{KnowledgeBase, Profile};
use folio_shared::Intent;

/// Fixed fallback set for unconfident or empty-category answers. Selection
/// between them is pseudo-random via the processor's injected rng.
pub(crate) const FALLBACK_RESPONSES: &[&str] = &[
    "I'm not sure I caught that. You can ask me about my experience, skills, \
     projects, awards, certifications, or how to get in touch.",
    "Hmm, that one's outside what I know. Try asking about my work experience, \
     technical skills, or recent projects.",
    "I can best answer questions about my background, skills, projects, awards, \
     certifications, and contact details. What would you like to know?",
    "Let's try a different angle — ask me about my professional experience, key \
     skills, or a project I've built.",
];

pub(crate) const EMPTY_QUERY_RESPONSE: &str =
    "I didn't catch that — could you type a question? You can ask about my \
     experience, skills, or projects.";

pub(crate) const ERROR_RESPONSE: &str =
    "Something went wrong on my end. Try asking about my experience, skills, \
     projects, or contact details.";

/// Static follow-up suggestions per intent. `General` and anything unmapped
/// fall back to the default list of four.
pub(crate) fn suggestions_for(intent: Intent) -> Vec<String> {
    let items: &[&str] = match intent {
        Intent::Experience => &[
            "What technologies do you use?",
            "Tell me about your projects",
            "What are your achievements?",
        ],
        Intent::Skills => &[
            "What is your work experience?",
            "What projects have you built?",
            "Do you have certifications?",
        ],
        Intent::Projects => &[
            "What skills do you have?",
            "What is your work experience?",
            "How can I contact you?",
        ],
        Intent::Awards => &[
            "Do you have certifications?",
            "What projects have you built?",
        ],
        Intent::Contact => &["What is your work experience?", "Tell me about yourself"],
        Intent::Certifications => &[
            "What skills do you have?",
            "What are your achievements?",
        ],
        Intent::Personal => &[
            "What is your work experience?",
            "What skills do you have?",
            "How can I contact you?",
        ],
        Intent::General => &[
            "What is your work experience?",
            "What skills do you have?",
            "Tell me about your projects",
            "How can I contact you?",
        ],
    };
    items.iter().map(|s| s.to_string()).collect()
}

/// One-line canned replies used when the full answer misses the reply budget.
/// Deliberately profile-agnostic.
pub(crate) fn quick_response(intent: Intent) -> String {
    let line = match intent {
        Intent::Experience => {
            "That's a longer story than I can tell right now — ask again and I'll walk \
             through my work history."
        }
        Intent::Skills => {
            "Quick answer: my skills are grouped by area — ask again and I'll list them out."
        }
        Intent::Projects => {
            "I have a few projects worth showing — ask again and I'll go through them."
        }
        Intent::Awards => "I've picked up a few awards — ask again for the details.",
        Intent::Contact => "Happy to connect — ask again and I'll share contact details.",
        Intent::Certifications => {
            "I hold a couple of certifications — ask again for the full list."
        }
        Intent::Personal => "Ask again and I'll give you a proper introduction.",
        Intent::General => {
            "That took longer than expected. Try asking about my experience, skills, or \
             projects."
        }
    };
    line.to_string()
}

/// Renders the category answer for a topical intent. Returns `None` when the
/// category holds no data, which sends the caller to the fallback set.
pub(crate) fn render_category(
    knowledge: &KnowledgeBase,
    intent: Intent,
    repeat_topic: bool,
) -> Option<String> {
    let profile = knowledge.profile();
    match intent {
        Intent::Experience => format_experience(profile, repeat_topic),
        Intent::Skills => format_skills(profile, repeat_topic),
        Intent::Projects => format_projects(profile, repeat_topic),
        Intent::Awards => format_awards(profile),
        Intent::Certifications => format_certifications(profile),
        Intent::Contact => format_contact(profile),
        Intent::Personal => format_personal(profile),
        Intent::General => None,
    }
}

fn format_experience(profile: &Profile, repeat_topic: bool) -> Option<String> {
    if profile.experience.is_empty() {
        return None;
    }
    let mut out = String::from(if repeat_topic {
        "More on my experience — here's the full picture:"
    } else {
        "Here's my work experience:"
    });
    for entry in &profile.experience {
        out.push_str(&format!(
            "\n\n{} at {} ({}, {})",
            entry.title, entry.company, entry.duration, entry.location
        ));
        let top: Vec<&str> = entry
            .responsibilities
            .iter()
            .take(3)
            .map(|s| s.as_str())
            .collect();
        if !top.is_empty() {
            out.push_str(&format!("\nKey work: {}.", top.join("; ")));
        }
        if !entry.technologies.is_empty() {
            out.push_str(&format!("\nTechnologies: {}.", entry.technologies.join(", ")));
        }
    }
    Some(out)
}

fn format_skills(profile: &Profile, repeat_topic: bool) -> Option<String> {
    if profile.skills.is_empty() {
        return None;
    }
    let mut out = String::from(if repeat_topic {
        "Also on skills — the full breakdown:"
    } else {
        "Here's what I work with:"
    });
    for group in &profile.skills {
        out.push_str(&format!("\n{}: {}.", group.label, group.items.join(", ")));
    }
    Some(out)
}

fn format_projects(profile: &Profile, repeat_topic: bool) -> Option<String> {
    if profile.projects.is_empty() {
        return None;
    }
    let mut out = String::from(if repeat_topic {
        "More projects I can speak to:"
    } else {
        "A few projects I'm proud of:"
    });
    for project in &profile.projects {
        out.push_str(&format!("\n\n{} — {}.", project.name, project.description));
        if !project.technologies.is_empty() {
            out.push_str(&format!(" Built with {}.", project.technologies.join(", ")));
        }
        if !project.impact.is_empty() {
            out.push_str(&format!(" Impact: {}.", project.impact));
        }
    }
    Some(out)
}

fn format_awards(profile: &Profile) -> Option<String> {
    if profile.awards.is_empty() {
        return None;
    }
    let mut out = String::from("Recognition I've received:");
    for award in &profile.awards {
        out.push_str(&format!(
            "\n{} — {} ({})",
            award.title, award.organization, award.year
        ));
        if !award.description.is_empty() {
            out.push_str(&format!(". {}.", award.description));
        }
    }
    Some(out)
}

fn format_certifications(profile: &Profile) -> Option<String> {
    if profile.certifications.is_empty() {
        return None;
    }
    let mut out = String::from("My certifications:");
    for cert in &profile.certifications {
        out.push_str(&format!("\n{} — {} ({})", cert.name, cert.issuer, cert.year));
        if !cert.description.is_empty() {
            out.push_str(&format!(". {}.", cert.description));
        }
    }
    Some(out)
}

fn format_contact(profile: &Profile) -> Option<String> {
    let contact = &profile.contact;
    let mut lines = Vec::new();
    if let Some(email) = &contact.email {
        lines.push(format!("Email: {}", email));
    }
    if let Some(linkedin) = &contact.linkedin {
        lines.push(format!("LinkedIn: {}", linkedin));
    }
    if let Some(github) = &contact.github {
        lines.push(format!("GitHub: {}", github));
    }
    if let Some(location) = &contact.location {
        lines.push(format!("Location: {}", location));
    }
    if lines.is_empty() {
        return None;
    }
    Some(format!(
        "Here's how to reach me:\n{}\nFeel free to get in touch — I'm always happy to talk.",
        lines.join("\n")
    ))
}

fn format_personal(profile: &Profile) -> Option<String> {
    let p = &profile.personal;
    if p.name.is_empty() {
        return None;
    }
    let mut out = format!("I'm {}, {} at {}. {}.", p.name, p.role, p.company, p.summary);
    if !p.highlights.is_empty() {
        out.push_str(&format!(" Highlights: {}.", p.highlights.join("; ")));
    }
    if !p.location.is_empty() {
        out.push_str(&format!(" Based in {}.", p.location));
    }
    Some(out)
}
