//! Placeholder data for the screens. There is no backend contract behind
//! these; they exist so every screen has something to show.

use chrono::{Duration, Local};

use crate::group::{Answer, Event, Group, Question, Resource, Thread};

pub fn groups() -> Vec<Group> {
    vec![Group {
        id: "1".to_string(),
        name: "Advanced Mathematics".to_string(),
        description: "University level mathematics study group".to_string(),
        focus_area: "Mathematics".to_string(),
        member_count: 12,
        active: true,
    }]
}

pub fn recommended_groups() -> Vec<Group> {
    vec![
        Group {
            id: "2".to_string(),
            name: "Intro to Programming".to_string(),
            description: "Learn programming fundamentals together".to_string(),
            focus_area: "Programming".to_string(),
            member_count: 24,
            active: true,
        },
        Group {
            id: "3".to_string(),
            name: "Physics Problem Solving".to_string(),
            description: "Mechanics and electromagnetism practice".to_string(),
            focus_area: "Physics".to_string(),
            member_count: 8,
            active: false,
        },
    ]
}

/// Long-form description shown on the group screen.
pub fn group_blurb(group: &Group) -> String {
    match group.id.as_str() {
        "1" => "University level mathematics study group focusing on calculus, linear algebra, and advanced topics.".to_string(),
        _ => group.description.clone(),
    }
}

pub fn events() -> Vec<Event> {
    let now = Local::now();
    let tomorrow = now + Duration::days(1);
    let day_after = now + Duration::days(2);
    vec![
        Event {
            id: "1".to_string(),
            title: "Group Study Session".to_string(),
            description: "Preparing for calculus midterm".to_string(),
            start_time: tomorrow,
            end_time: tomorrow + Duration::hours(2),
            created_by: "John Doe".to_string(),
            attendee_count: 5,
        },
        Event {
            id: "2".to_string(),
            title: "Problem Solving Workshop".to_string(),
            description: "Practice solving complex integration problems".to_string(),
            start_time: day_after,
            end_time: day_after + Duration::hours(2),
            created_by: "Jane Smith".to_string(),
            attendee_count: 8,
        },
    ]
}

pub fn resources() -> Vec<Resource> {
    let now = Local::now();
    vec![
        Resource {
            id: "1".to_string(),
            title: "Calculus Notes - Week 1".to_string(),
            description: "Introduction to limits and derivatives".to_string(),
            file_url: "https://example.com/file1.pdf".to_string(),
            file_type: "pdf".to_string(),
            uploaded_by: "John Doe".to_string(),
            uploaded_at: now,
            category: "Notes".to_string(),
        },
        Resource {
            id: "2".to_string(),
            title: "Practice Problems".to_string(),
            description: "Exercise set for integration".to_string(),
            file_url: "https://example.com/file2.pdf".to_string(),
            file_type: "pdf".to_string(),
            uploaded_by: "Jane Smith".to_string(),
            uploaded_at: now,
            category: "Exercises".to_string(),
        },
    ]
}

pub fn questions() -> Vec<Question> {
    let now = Local::now();
    vec![
        Question {
            id: "1".to_string(),
            title: "How to solve this integral?".to_string(),
            content: "I am stuck with this complex integration problem...".to_string(),
            asked_by: "John Doe".to_string(),
            created_at: now,
            solved: true,
            answer_count: 3,
        },
        Question {
            id: "2".to_string(),
            title: "Derivative question".to_string(),
            content: "Need help understanding chain rule...".to_string(),
            asked_by: "Jane Smith".to_string(),
            created_at: now,
            solved: false,
            answer_count: 1,
        },
    ]
}

/// Full thread for a question id, with the long-form body.
pub fn thread(question_id: &str) -> Option<Thread> {
    let mut question = questions().into_iter().find(|q| q.id == question_id)?;
    let now = Local::now();

    let answers = match question_id {
        "1" => {
            question.content = "I am stuck with this complex integration problem: ∫(x²+2x+1)dx. Can someone help me understand the steps?".to_string();
            vec![Answer {
                id: "1".to_string(),
                content: "Let's solve this step by step...".to_string(),
                answered_by: "Jane Smith".to_string(),
                answered_at: now,
            }]
        }
        _ => Vec::new(),
    };

    Some(Thread { question, answers })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_are_two_hours() {
        for event in events() {
            assert_eq!(event.end_time - event.start_time, Duration::hours(2));
            assert!(event.start_time > Local::now());
        }
    }

    #[test]
    fn test_thread_lookup() {
        let thread = thread("1").unwrap();
        assert!(thread.question.content.contains("∫(x²+2x+1)dx"));
        assert_eq!(thread.answers.len(), 1);
        assert!(super::thread("404").is_none());
    }
}
