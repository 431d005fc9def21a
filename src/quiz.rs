use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    letter: char,
    text: String,
    is_correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    title: String,
    answers: Vec<Answer>,
    explanation: String,
}

/// Ordered, immutable list of questions produced by one generation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionSet {
    questions: Vec<Question>,
}

/// Uppercases an answer letter, Cyrillic included.
///
/// Letters whose uppercase form is more than one char are kept as they are.
pub fn normalize_letter(letter: char) -> char {
    let mut upper = letter.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(single), None) => single,
        _ => letter,
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}) {}", self.letter, self.text)
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let answers = self
            .answers
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n");

        write!(f, "{}\n\n{}", self.title, answers)
    }
}

impl Answer {
    /// The letter is stored uppercased.
    pub fn new(letter: char, text: impl Into<String>, is_correct: bool) -> Self {
        Self {
            letter: normalize_letter(letter),
            text: text.into(),
            is_correct,
        }
    }

    pub fn letter(&self) -> char {
        self.letter
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_correct(&self) -> bool {
        self.is_correct
    }
}

impl Question {
    pub fn new(title: impl Into<String>, answers: Vec<Answer>, explanation: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            answers,
            explanation: explanation.into(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    pub fn letters(&self) -> Vec<char> {
        self.answers.iter().map(Answer::letter).collect()
    }

    pub fn find_answer(&self, letter: char) -> Option<&Answer> {
        let letter = normalize_letter(letter);
        self.answers.iter().find(|answer| answer.letter == letter)
    }
}

impl QuestionSet {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn get(&self, idx: usize) -> Option<&Question> {
        self.questions.get(idx)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

impl From<Vec<Question>> for QuestionSet {
    fn from(questions: Vec<Question>) -> Self {
        Self::new(questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capital_question() -> Question {
        Question::new(
            "Столица Франции?",
            vec![
                Answer::new('a', "Берлин", false),
                Answer::new('b', "Париж", true),
                Answer::new('c', "Мадрид", false),
                Answer::new('d', "Рим", false),
            ],
            "Париж является столицей Франции.",
        )
    }

    #[test]
    fn question_renders_title_and_lettered_answers() {
        let rendered = capital_question().to_string();
        assert_eq!(
            rendered,
            "Столица Франции?\n\nA) Берлин\nB) Париж\nC) Мадрид\nD) Рим"
        );
    }

    #[test]
    fn find_answer_ignores_case() {
        let question = capital_question();
        let answer = question.find_answer('b').expect("answer B exists");
        assert!(answer.is_correct());
        assert!(question.find_answer('z').is_none());
    }

    #[test]
    fn cyrillic_letters_are_matched_case_insensitively() {
        let question = Question::new(
            "Столица России?",
            vec![Answer::new('а', "Казань", false), Answer::new('Б', "Москва", true)],
            "",
        );
        assert_eq!(question.letters(), vec!['А', 'Б']);
        assert!(question.find_answer('б').is_some_and(Answer::is_correct));
        assert_eq!(question.find_answer('А').map(Answer::text), Some("Казань"));
    }

    #[test]
    fn multi_char_uppercase_is_left_alone() {
        assert_eq!(normalize_letter('ß'), 'ß');
        assert_eq!(normalize_letter('g'), 'G');
    }
}
