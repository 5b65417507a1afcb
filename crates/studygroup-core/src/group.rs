//! Group, channel and listing types, plus the local-only mutations the
//! screens perform (create group, add resource, post answer).

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub description: String,
    pub focus_area: String,
    pub member_count: u32,
    pub active: bool,
}

impl Group {
    /// Up to two initials for the group's avatar.
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|w| w.chars().next())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect()
    }

    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        query.is_empty()
            || self.name.to_lowercase().contains(&query)
            || self.description.to_lowercase().contains(&query)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Chat,
    Resources,
    Questions,
    Events,
}

impl Channel {
    pub fn all() -> Vec<Channel> {
        vec![Channel::Chat, Channel::Resources, Channel::Questions, Channel::Events]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Channel::Chat => "chat",
            Channel::Resources => "resources",
            Channel::Questions => "questions",
            Channel::Events => "events",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: String,
    pub start_time: DateTime<Local>,
    pub end_time: DateTime<Local>,
    pub created_by: String,
    pub attendee_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: String,
    pub title: String,
    pub description: String,
    pub file_url: String,
    pub file_type: String,
    pub uploaded_by: String,
    pub uploaded_at: DateTime<Local>,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub title: String,
    pub content: String,
    pub asked_by: String,
    pub created_at: DateTime<Local>,
    pub solved: bool,
    pub answer_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub id: String,
    pub content: String,
    pub answered_by: String,
    pub answered_at: DateTime<Local>,
}

/// Category chips for the resources channel: "All" followed by each
/// category in first-seen order.
pub fn resource_categories(resources: &[Resource]) -> Vec<String> {
    let mut categories = vec!["All".to_string()];
    for resource in resources {
        if !categories.contains(&resource.category) {
            categories.push(resource.category.clone());
        }
    }
    categories
}

pub fn filter_resources<'a>(resources: &'a [Resource], category: &str) -> Vec<&'a Resource> {
    resources
        .iter()
        .filter(|r| category == "All" || r.category == category)
        .collect()
}

/// Form state for the "Create Study Group" screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupDraft {
    pub name: String,
    pub description: String,
    pub focus_area: String,
}

impl GroupDraft {
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty()
    }

    /// Turn the draft into a group with `id`. `None` when the name is blank.
    pub fn build(&self, id: &str) -> Option<Group> {
        if !self.is_valid() {
            return None;
        }
        Some(Group {
            id: id.to_string(),
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            focus_area: self.focus_area.trim().to_string(),
            member_count: 1,
            active: true,
        })
    }
}

/// Form state for the upload-resource modal. Only metadata is recorded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceDraft {
    pub title: String,
    pub description: String,
    pub category: String,
}

impl ResourceDraft {
    pub fn is_valid(&self) -> bool {
        !self.title.trim().is_empty()
    }

    pub fn build(&self, id: &str) -> Option<Resource> {
        if !self.is_valid() {
            return None;
        }
        let category = match self.category.trim() {
            "" => "Other".to_string(),
            c => c.to_string(),
        };
        Some(Resource {
            id: id.to_string(),
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            file_url: String::new(),
            file_type: String::new(),
            uploaded_by: "You".to_string(),
            uploaded_at: Local::now(),
            category,
        })
    }
}

/// A question thread: the question and its answers.
#[derive(Debug, Clone, PartialEq)]
pub struct Thread {
    pub question: Question,
    pub answers: Vec<Answer>,
}

impl Thread {
    /// Append an answer from the current user. Blank text is ignored.
    /// The listed count may include answers not loaded here, so it only
    /// ever grows.
    pub fn post_answer(&mut self, text: &str) -> bool {
        if text.trim().is_empty() {
            return false;
        }
        let id = (self.answers.len() + 1).to_string();
        self.answers.push(Answer {
            id,
            content: text.trim().to_string(),
            answered_by: "You".to_string(),
            answered_at: Local::now(),
        });
        self.question.answer_count += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn test_initials() {
        let group = fixtures::groups().remove(0);
        assert_eq!(group.initials(), "AM");

        let single = Group { name: "rust".to_string(), ..group };
        assert_eq!(single.initials(), "R");
    }

    #[test]
    fn test_group_search() {
        let group = fixtures::groups().remove(0);
        assert!(group.matches(""));
        assert!(group.matches("MATH"));
        assert!(group.matches("university"));
        assert!(!group.matches("chemistry"));
    }

    #[test]
    fn test_group_draft_requires_name() {
        let mut draft = GroupDraft::default();
        draft.description = "no name".to_string();
        assert!(draft.build("9").is_none());

        draft.name = "  Organic Chemistry ".to_string();
        let group = draft.build("9").unwrap();
        assert_eq!(group.name, "Organic Chemistry");
        assert_eq!(group.initials(), "OC");
    }

    #[test]
    fn test_resource_filter_by_category() {
        let resources = fixtures::resources();
        let categories = resource_categories(&resources);
        assert_eq!(categories, vec!["All", "Notes", "Exercises"]);

        assert_eq!(filter_resources(&resources, "All").len(), resources.len());
        let notes = filter_resources(&resources, "Notes");
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, "Calculus Notes - Week 1");
    }

    #[test]
    fn test_resource_draft_defaults_category() {
        let draft = ResourceDraft {
            title: "Flashcards".to_string(),
            ..ResourceDraft::default()
        };
        let resource = draft.build("3").unwrap();
        assert_eq!(resource.category, "Other");
        assert_eq!(resource.uploaded_by, "You");
    }

    #[test]
    fn test_post_answer() {
        let mut thread = fixtures::thread("1").unwrap();
        let before = thread.answers.len();
        let listed = thread.question.answer_count;

        assert!(!thread.post_answer("  "));
        assert_eq!(thread.question.answer_count, listed);
        assert!(thread.post_answer("  Integrate term by term. "));
        assert_eq!(thread.answers.len(), before + 1);
        assert_eq!(thread.question.answer_count, listed + 1);
        let answer = thread.answers.last().unwrap();
        assert_eq!(answer.answered_by, "You");
        assert_eq!(answer.content, "Integrate term by term.");
    }
}
