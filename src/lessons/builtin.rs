//! Lessons compiled into the binary.
//!
//! The "library" lesson grows one sentence over six formulas, from
//! "Library opens" to a fronted-adverbial sentence with an object and two
//! time phrases.

use crate::core::{Activity, ActivityType, Answer, Formula, NewElement};
use crate::error::{Result, WrifeError};
use crate::lessons::traits::{Lesson, LessonInfo, LessonSource};

/// Id of the built-in demo lesson.
pub const LIBRARY_LESSON_ID: &str = "library";

/// The six formulas of the library lesson.
pub fn library_formulas() -> Vec<Formula> {
    let f1 = ["Library", "opens"];
    let f2 = ["Library", "quietly", "opens"];
    let f3 = ["Library", "quietly", "opens", "in", "the", "morning"];
    let f4 = [
        "Library", "quietly", "opens", "in", "the", "morning", "before", "school",
    ];
    let f5 = [
        "Every", "weekday,", "Library", "quietly", "opens", "in", "the", "morning", "before",
        "school",
    ];
    let f6 = [
        "Every", "weekday,", "Library", "quietly", "opens", "its", "doors", "in", "the",
        "morning", "before", "school",
    ];

    vec![
        Formula::new(
            1,
            ["Subject", "Verb"],
            Vec::<String>::new(),
            NewElement::new("Verb")
                .with_examples(["opens", "closes"])
                .with_placeholder("Type the whole sentence"),
            f1,
        )
        .with_hint("Who is the sentence about, and what does it do?"),
        Formula::new(
            2,
            ["Subject", "Adverb", "Verb"],
            f1,
            NewElement::new("Adverb")
                .with_examples(["quietly", "slowly"])
                .with_placeholder("How does it open?"),
            f2,
        ),
        Formula::new(
            3,
            ["Subject", "Adverb", "Verb", "Prepositional phrase"],
            f2,
            NewElement::new("Prepositional phrase")
                .with_examples(["in the morning"])
                .with_placeholder("When does it open?"),
            f3,
        ),
        Formula::new(
            4,
            [
                "Subject",
                "Adverb",
                "Verb",
                "Prepositional phrase",
                "Time connective",
            ],
            f3,
            NewElement::new("Time connective")
                .with_examples(["before school"])
                .with_placeholder("Before what?"),
            f4,
        ),
        Formula::new(
            5,
            [
                "Fronted adverbial",
                "Subject",
                "Adverb",
                "Verb",
                "Prepositional phrase",
                "Time connective",
            ],
            f4,
            NewElement::new("Fronted adverbial")
                .with_examples(["Every weekday,"])
                .with_placeholder("How often?"),
            f5,
        )
        .with_hint("Start with how often it happens, and keep the comma: \"Every weekday,\"."),
        Formula::new(
            6,
            [
                "Fronted adverbial",
                "Subject",
                "Adverb",
                "Verb",
                "Object",
                "Prepositional phrase",
                "Time connective",
            ],
            f5,
            NewElement::new("Object")
                .with_examples(["its doors"])
                .with_placeholder("What does it open?"),
            f6,
        ),
    ]
}

fn library_activities() -> Vec<Activity> {
    vec![
        Activity {
            id: "adverb-choice".to_string(),
            activity_type: ActivityType::MultipleChoice,
            prompt: "Which word is the adverb in \"Library quietly opens\"?".to_string(),
            options: vec![
                "Library".to_string(),
                "quietly".to_string(),
                "opens".to_string(),
            ],
            answer: Answer::text("quietly"),
            hint: Some("An adverb tells us how something happens.".to_string()),
        },
        Activity {
            id: "verb-blank".to_string(),
            activity_type: ActivityType::FillBlank,
            prompt: "Every weekday, Library quietly ____ its doors.".to_string(),
            options: Vec::new(),
            answer: Answer::text("opens"),
            hint: None,
        },
        Activity {
            id: "word-order".to_string(),
            activity_type: ActivityType::Sort,
            prompt: "Put the words in order: opens / Library / quietly".to_string(),
            options: Vec::new(),
            answer: Answer::list(["Library", "quietly", "opens"]),
            hint: None,
        },
        Activity {
            id: "word-classes".to_string(),
            activity_type: ActivityType::Match,
            prompt: "Match each word to its word class.".to_string(),
            options: Vec::new(),
            answer: Answer::map([
                ("Library", "noun"),
                ("quietly", "adverb"),
                ("opens", "verb"),
            ]),
            hint: None,
        },
        Activity {
            id: "phrase-zones".to_string(),
            activity_type: ActivityType::DragDrop,
            prompt: "Drag each phrase to the question it answers.".to_string(),
            options: vec![
                "in the morning".to_string(),
                "its doors".to_string(),
                "Every weekday,".to_string(),
            ],
            answer: Answer::map([
                ("in the morning", "when"),
                ("its doors", "what"),
                ("Every weekday,", "how often"),
            ]),
            hint: None,
        },
    ]
}

/// The built-in library lesson.
pub fn library_lesson() -> Lesson {
    Lesson {
        id: LIBRARY_LESSON_ID.to_string(),
        title: "The Library Opens".to_string(),
        description: "Grow a two-word sentence into a fronted-adverbial sentence.".to_string(),
        formulas: library_formulas(),
        activities: library_activities(),
    }
}

/// Source for the compiled-in lessons.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinLessons;

impl LessonSource for BuiltinLessons {
    fn load(&self, lesson_id: &str) -> Result<Lesson> {
        match lesson_id {
            LIBRARY_LESSON_ID => Ok(library_lesson()),
            _ => Err(WrifeError::lesson_not_found(lesson_id)),
        }
    }

    fn list(&self) -> Result<Vec<LessonInfo>> {
        Ok(vec![library_lesson().info(self.name())])
    }

    fn name(&self) -> &'static str {
        "builtin"
    }
}
