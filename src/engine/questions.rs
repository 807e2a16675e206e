use chrono::Utc;
use std::str::FromStr;
use tracing::info;

use crate::room::{
    errors::RoomError,
    models::{EntityId, Question, QuestionStatus, Room},
};

/// Moderated question list with a free triage status
pub struct QuestionQueue;

impl QuestionQueue {
    pub fn submit(room: &mut Room, author: &str, text: &str) -> Result<Question, RoomError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(RoomError::validation("question is empty"));
        }

        let question = Question {
            id: room.next_id(),
            text: text.to_string(),
            author: author.to_string(),
            status: QuestionStatus::Pending,
            created_at: Utc::now(),
        };
        room.questions.push(question.clone());

        info!(room_id = %room.id, question_id = question.id, "Question submitted");
        Ok(question)
    }

    pub fn set_status(
        room: &mut Room,
        question_id: EntityId,
        status: QuestionStatus,
    ) -> Result<Question, RoomError> {
        let room_id = room.id.clone();
        let question = room
            .questions
            .iter_mut()
            .find(|q| q.id == question_id)
            .ok_or_else(|| RoomError::not_found(format!("question {question_id}")))?;

        question.status = status;
        info!(room_id = %room_id, question_id = question_id, status = %status, "Question status changed");
        Ok(question.clone())
    }

    /// Parses a wire status name
    pub fn parse_status(status: &str) -> Result<QuestionStatus, RoomError> {
        QuestionStatus::from_str(status)
            .map_err(|_| RoomError::validation(format!("unknown question status '{status}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::empty_room;
    use rstest::rstest;

    #[test]
    fn test_submit_starts_pending() {
        let mut room = empty_room();

        let question = QuestionQueue::submit(&mut room, "Alice", "why?").unwrap();

        assert_eq!(question.status, QuestionStatus::Pending);
        assert_eq!(question.text, "why?");
        assert_eq!(room.questions, vec![question]);
    }

    #[test]
    fn test_empty_question_is_rejected() {
        let mut room = empty_room();
        assert!(matches!(
            QuestionQueue::submit(&mut room, "Alice", " "),
            Err(RoomError::Validation(_))
        ));
        assert!(room.questions.is_empty());
    }

    #[test]
    fn test_status_walk_keeps_text_and_author() {
        let mut room = empty_room();
        let id = QuestionQueue::submit(&mut room, "Alice", "why?").unwrap().id;

        QuestionQueue::set_status(&mut room, id, QuestionStatus::InProgress).unwrap();
        let done = QuestionQueue::set_status(&mut room, id, QuestionStatus::Completed).unwrap();

        assert_eq!(done.status, QuestionStatus::Completed);
        assert_eq!(room.questions.len(), 1);
        assert_eq!(room.questions[0].text, "why?");
        assert_eq!(room.questions[0].author, "Alice");
    }

    #[test]
    fn test_any_status_reachable_from_completed() {
        let mut room = empty_room();
        let id = QuestionQueue::submit(&mut room, "Alice", "why?").unwrap().id;
        QuestionQueue::set_status(&mut room, id, QuestionStatus::Completed).unwrap();

        let reopened = QuestionQueue::set_status(&mut room, id, QuestionStatus::Pending).unwrap();
        assert_eq!(reopened.status, QuestionStatus::Pending);
    }

    #[test]
    fn test_unknown_question_is_not_found() {
        let mut room = empty_room();
        assert!(matches!(
            QuestionQueue::set_status(&mut room, 7, QuestionStatus::Completed),
            Err(RoomError::NotFound(_))
        ));
    }

    #[rstest]
    #[case("pending", Some(QuestionStatus::Pending))]
    #[case("inProgress", Some(QuestionStatus::InProgress))]
    #[case("completed", Some(QuestionStatus::Completed))]
    #[case("in_progress", None)]
    #[case("", None)]
    fn test_parse_status(#[case] raw: &str, #[case] expected: Option<QuestionStatus>) {
        assert_eq!(QuestionQueue::parse_status(raw).ok(), expected);
    }
}
