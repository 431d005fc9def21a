//! Texts sent back to the user.

use crate::session::AnswerOutcome;

pub const START_BUTTON: &str = "Начать";
pub const NEXT_BUTTON: &str = "Дальше";

pub const ASK_TOPIC: &str = "Привет! Введите тему викторины:";
pub const CANCELLED: &str = "Викторина отменена. Введите новую тему:";
pub const GENERATING: &str = "Генерирую викторину, это может занять до 1 минуты";
pub const PRESS_NEXT: &str = "Нажмите 'Дальше' для следующего вопроса.";
pub const RESTART_HINT: &str = "Нажмите '/start', чтобы начать новую викторину.";
pub const TEXT_ONLY: &str = "Пожалуйста, отправьте текстовое сообщение.";
pub const INTERNAL_ERROR: &str =
    "Что-то пошло не так, викторина сброшена. Введите тему, чтобы попробовать снова.";

pub fn generation_failed(topic: &str) -> String {
    format!("Не удалось получить вопросы по теме '{topic}'. Попробуйте другую тему.")
}

pub fn quiz_ready(topic: &str, total: usize) -> String {
    format!("Викторина по теме '{topic}' готова! Вопросов: {total}. Нажмите '{START_BUTTON}', чтобы начать.")
}

pub fn question(number: usize, text: &str) -> String {
    format!("Вопрос №{number}\n{text}")
}

pub fn feedback(outcome: &AnswerOutcome) -> String {
    let verdict = if outcome.correct {
        "Правильно! 🎉"
    } else {
        "Неверно. 😞"
    };

    if outcome.explanation.is_empty() {
        verdict.to_owned()
    } else {
        format!("{verdict}\n\n{}", outcome.explanation)
    }
}

pub fn completed(score: usize, total: usize) -> String {
    format!("Викторина завершена! Ваш результат: {score} из {total}.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feedback_includes_explanation() {
        let outcome = AnswerOutcome {
            correct: true,
            explanation: "Так и есть.".into(),
        };
        assert_eq!(feedback(&outcome), "Правильно! 🎉\n\nТак и есть.");
    }

    #[test]
    fn feedback_without_explanation_is_just_the_verdict() {
        let outcome = AnswerOutcome {
            correct: false,
            explanation: String::new(),
        };
        assert_eq!(feedback(&outcome), "Неверно. 😞");
    }

    #[test]
    fn completion_reports_score_out_of_total() {
        assert_eq!(completed(3, 10), "Викторина завершена! Ваш результат: 3 из 10.");
    }
}
