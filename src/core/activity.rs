//! Practice activity grading.
//!
//! Each activity type has one grading rule, dispatched through
//! [`validate_answer`]. Answers arrive in one of three shapes; a shape that
//! does not fit the activity type is graded as incorrect.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// Kinds of practice activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    MultipleChoice,
    FillBlank,
    Sort,
    Match,
    DragDrop,
}

impl ActivityType {
    /// Config/data representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::MultipleChoice => "multiple_choice",
            ActivityType::FillBlank => "fill_blank",
            ActivityType::Sort => "sort",
            ActivityType::Match => "match",
            ActivityType::DragDrop => "drag_drop",
        }
    }
}

impl std::fmt::Display for ActivityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A learner's answer, or an activity's correct answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    /// A single choice or blank.
    Text(String),
    /// Ordered items or several blanks.
    List(Vec<String>),
    /// Pairs such as term -> definition or item -> zone.
    Map(BTreeMap<String, String>),
}

impl Answer {
    /// Create a text answer.
    pub fn text(value: impl Into<String>) -> Self {
        Answer::Text(value.into())
    }

    /// Create a list answer.
    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Answer::List(items.into_iter().map(Into::into).collect())
    }

    /// Create a map answer.
    pub fn map<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Answer::Map(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// One practice activity in a lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    pub answer: Answer,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl Activity {
    /// Grade a learner's answer against this activity.
    pub fn grade(&self, user: &Answer) -> bool {
        validate_answer(self.activity_type, user, &self.answer)
    }
}

fn norm(value: &str) -> String {
    value.trim().to_lowercase()
}

fn texts_match(user: &str, correct: &str) -> bool {
    norm(user) == norm(correct)
}

fn lists_match(user: &[String], correct: &[String]) -> bool {
    user.len() == correct.len()
        && user
            .iter()
            .zip(correct)
            .all(|(u, c)| texts_match(u, c))
}

fn maps_match(user: &BTreeMap<String, String>, correct: &BTreeMap<String, String>) -> bool {
    let normalize = |m: &BTreeMap<String, String>| -> BTreeMap<String, String> {
        m.iter().map(|(k, v)| (norm(k), norm(v))).collect()
    };
    user.len() == correct.len() && normalize(user) == normalize(correct)
}

fn grade_multiple_choice(user: &Answer, correct: &Answer) -> bool {
    match (user, correct) {
        (Answer::Text(u), Answer::Text(c)) => texts_match(u, c),
        _ => false,
    }
}

fn grade_fill_blank(user: &Answer, correct: &Answer) -> bool {
    match (user, correct) {
        (Answer::Text(u), Answer::Text(c)) => texts_match(u, c),
        (Answer::List(u), Answer::List(c)) => lists_match(u, c),
        (Answer::List(u), Answer::Text(c)) | (Answer::Text(c), Answer::List(u))
            if u.len() == 1 =>
        {
            texts_match(&u[0], c)
        }
        _ => false,
    }
}

fn grade_sort(user: &Answer, correct: &Answer) -> bool {
    match (user, correct) {
        (Answer::List(u), Answer::List(c)) => lists_match(u, c),
        _ => false,
    }
}

fn grade_match(user: &Answer, correct: &Answer) -> bool {
    match (user, correct) {
        (Answer::Map(u), Answer::Map(c)) => maps_match(u, c),
        _ => false,
    }
}

fn grade_drag_drop(user: &Answer, correct: &Answer) -> bool {
    match (user, correct) {
        (Answer::Map(u), Answer::Map(c)) => maps_match(u, c),
        (Answer::List(u), Answer::List(c)) => lists_match(u, c),
        _ => false,
    }
}

/// Grade `user` against `correct` under the rule for `activity_type`.
pub fn validate_answer(activity_type: ActivityType, user: &Answer, correct: &Answer) -> bool {
    match activity_type {
        ActivityType::MultipleChoice => grade_multiple_choice(user, correct),
        ActivityType::FillBlank => grade_fill_blank(user, correct),
        ActivityType::Sort => grade_sort(user, correct),
        ActivityType::Match => grade_match(user, correct),
        ActivityType::DragDrop => grade_drag_drop(user, correct),
    }
}

/// Result for one activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityResult {
    pub id: String,
    pub activity_type: ActivityType,
    pub answered: bool,
    pub correct: bool,
}

/// Results for a set of activities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeReport {
    pub results: Vec<ActivityResult>,
    pub correct: usize,
    pub total: usize,
    /// Percentage of activities answered correctly (0 when there are none).
    pub score: f64,
}

/// Grade every activity; a missing answer counts as incorrect.
pub fn grade_all(activities: &[Activity], answers: &HashMap<String, Answer>) -> GradeReport {
    let results: Vec<ActivityResult> = activities
        .iter()
        .map(|activity| {
            let answer = answers.get(&activity.id);
            ActivityResult {
                id: activity.id.clone(),
                activity_type: activity.activity_type,
                answered: answer.is_some(),
                correct: answer.map(|a| activity.grade(a)).unwrap_or(false),
            }
        })
        .collect();

    let correct = results.iter().filter(|r| r.correct).count();
    let total = results.len();
    let score = if total == 0 {
        0.0
    } else {
        correct as f64 * 100.0 / total as f64
    };

    GradeReport {
        results,
        correct,
        total,
        score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn activity(id: &str, activity_type: ActivityType, answer: Answer) -> Activity {
        Activity {
            id: id.to_string(),
            activity_type,
            prompt: format!("prompt for {}", id),
            options: Vec::new(),
            answer,
            hint: None,
        }
    }

    #[test]
    fn test_multiple_choice() {
        let correct = Answer::text("Adverb");
        assert!(validate_answer(ActivityType::MultipleChoice, &Answer::text(" adverb "), &correct));
        assert!(!validate_answer(ActivityType::MultipleChoice, &Answer::text("Verb"), &correct));
        assert!(!validate_answer(
            ActivityType::MultipleChoice,
            &Answer::list(["Adverb"]),
            &correct
        ));
    }

    #[test]
    fn test_fill_blank_text_and_blanks() {
        assert!(validate_answer(
            ActivityType::FillBlank,
            &Answer::text("Quietly"),
            &Answer::text("quietly")
        ));
        assert!(validate_answer(
            ActivityType::FillBlank,
            &Answer::list(["in", "Morning"]),
            &Answer::list(["in", "morning"])
        ));
        assert!(!validate_answer(
            ActivityType::FillBlank,
            &Answer::list(["in"]),
            &Answer::list(["in", "morning"])
        ));
    }

    #[test]
    fn test_fill_blank_single_item_list_equals_text() {
        assert!(validate_answer(
            ActivityType::FillBlank,
            &Answer::list(["opens"]),
            &Answer::text("opens")
        ));
        assert!(validate_answer(
            ActivityType::FillBlank,
            &Answer::text("opens"),
            &Answer::list(["opens"])
        ));
        assert!(!validate_answer(
            ActivityType::FillBlank,
            &Answer::list(["opens", "doors"]),
            &Answer::text("opens")
        ));
    }

    #[test]
    fn test_sort_order_matters() {
        let correct = Answer::list(["Every", "weekday", "Library", "opens"]);
        assert!(validate_answer(
            ActivityType::Sort,
            &Answer::list(["every", "weekday", "library", "opens"]),
            &correct
        ));
        assert!(!validate_answer(
            ActivityType::Sort,
            &Answer::list(["weekday", "every", "library", "opens"]),
            &correct
        ));
    }

    #[test]
    fn test_match_ignores_pair_order_and_case() {
        let correct = Answer::map([("quietly", "adverb"), ("library", "noun")]);
        assert!(validate_answer(
            ActivityType::Match,
            &Answer::map([("Library", "Noun"), ("Quietly", "Adverb")]),
            &correct
        ));
        assert!(!validate_answer(
            ActivityType::Match,
            &Answer::map([("library", "noun")]),
            &correct
        ));
        assert!(!validate_answer(
            ActivityType::Match,
            &Answer::map([("library", "adverb"), ("quietly", "noun")]),
            &correct
        ));
    }

    #[test]
    fn test_match_collapsed_keys_rejected() {
        let correct = Answer::map([("a", "x"), ("b", "y")]);
        assert!(!validate_answer(
            ActivityType::Match,
            &Answer::map([("A", "x"), ("a", "x")]),
            &correct
        ));
    }

    #[test]
    fn test_drag_drop_accepts_map_or_list() {
        assert!(validate_answer(
            ActivityType::DragDrop,
            &Answer::map([("opens", "verb")]),
            &Answer::map([("opens", "Verb")])
        ));
        assert!(validate_answer(
            ActivityType::DragDrop,
            &Answer::list(["a", "b"]),
            &Answer::list(["A", "B"])
        ));
        assert!(!validate_answer(
            ActivityType::DragDrop,
            &Answer::text("a"),
            &Answer::list(["a"])
        ));
    }

    #[test]
    fn test_answer_json_shapes() {
        let text: Answer = serde_json::from_str(r#""opens""#).unwrap();
        let list: Answer = serde_json::from_str(r#"["a","b"]"#).unwrap();
        let map: Answer = serde_json::from_str(r#"{"a":"x"}"#).unwrap();

        assert_eq!(text, Answer::text("opens"));
        assert_eq!(list, Answer::list(["a", "b"]));
        assert_eq!(map, Answer::map([("a", "x")]));
    }

    #[test]
    fn test_activity_toml_shape() {
        let toml_content = r#"
id = "q1"
type = "multiple_choice"
prompt = "Which word is the adverb?"
options = ["library", "quietly", "opens"]
answer = "quietly"
"#;
        let activity: Activity = toml::from_str(toml_content).unwrap();
        assert_eq!(activity.activity_type, ActivityType::MultipleChoice);
        assert_eq!(activity.options.len(), 3);
        assert!(activity.grade(&Answer::text("Quietly")));
    }

    #[test]
    fn test_grade_all_counts_missing_as_incorrect() {
        let activities = vec![
            activity("q1", ActivityType::MultipleChoice, Answer::text("quietly")),
            activity("q2", ActivityType::Sort, Answer::list(["a", "b"])),
            activity("q3", ActivityType::FillBlank, Answer::text("opens")),
            activity("q4", ActivityType::Match, Answer::map([("a", "x")])),
        ];
        let mut answers = HashMap::new();
        answers.insert("q1".to_string(), Answer::text("Quietly"));
        answers.insert("q2".to_string(), Answer::list(["b", "a"]));
        answers.insert("q4".to_string(), Answer::map([("a", "x")]));

        let report = grade_all(&activities, &answers);

        assert_eq!(report.total, 4);
        assert_eq!(report.correct, 2);
        assert!((report.score - 50.0).abs() < f64::EPSILON);
        assert!(!report.results[2].answered);
        assert!(!report.results[2].correct);
        assert!(report.results[3].correct);
    }

    #[test]
    fn test_grade_all_empty() {
        let report = grade_all(&[], &HashMap::new());
        assert_eq!(report.total, 0);
        assert_eq!(report.score, 0.0);
    }
}
