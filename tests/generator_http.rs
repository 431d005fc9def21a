use mockito::Matcher;
use quizgenbot::config::GeneratorConfig;
use quizgenbot::error::{GenerationServiceError, QuizError};
use quizgenbot::generator::{GenerateQuestions, QuestionGenerator};
use serde_json::json;

const API_KEY: &str = "sk-test";

fn generator(base_url: String) -> QuestionGenerator {
    QuestionGenerator::new(GeneratorConfig::new(API_KEY).with_base_url(base_url))
        .expect("client builds")
}

fn completion(content: &str) -> String {
    json!({
        "id": "chatcmpl-1",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
    .to_string()
}

fn quiz_document() -> String {
    json!({
        "questions": [
            {
                "title": "Кто построил Колизей? 🏛️",
                "answers": [
                    {"letter": "A", "text": "Веспасиан", "correct": true},
                    {"letter": "B", "text": "Нерон", "correct": false},
                    {"letter": "C", "text": "Цезарь", "correct": false},
                    {"letter": "D", "text": "Август", "correct": false}
                ],
                "explanation": "Строительство начал Веспасиан."
            },
            {
                "title": "Два правильных",
                "answers": [
                    {"letter": "A", "text": "да", "correct": true},
                    {"letter": "B", "text": "тоже да", "correct": true}
                ],
                "explanation": ""
            },
            {
                "title": "Как назывался главный форум?",
                "answers": [
                    {"letter": "A", "text": "Форум Траяна", "correct": false},
                    {"letter": "B", "text": "Римский форум", "correct": true},
                    {"letter": "C", "text": "Форум Августа", "correct": false},
                    {"letter": "D", "text": "Форум Цезаря", "correct": false}
                ],
                "explanation": "Forum Romanum."
            }
        ]
    })
    .to_string()
}

#[tokio::test]
async fn generates_questions_from_completion() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", format!("Bearer {API_KEY}").as_str())
        .match_body(Matcher::PartialJson(json!({"model": "gpt-4o", "n": 1})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion(&quiz_document()))
        .create_async()
        .await;

    let questions = generator(server.url())
        .generate("Древний Рим", 10)
        .await
        .expect("questions are generated");

    mock.assert_async().await;
    assert_eq!(questions.len(), 2);
    assert_eq!(questions.questions()[0].title(), "Кто построил Колизей? 🏛️");
    assert_eq!(questions.questions()[1].title(), "Как назывался главный форум?");
}

#[tokio::test]
async fn error_status_carries_service_message() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}}"#)
        .create_async()
        .await;

    let err = generator(server.url())
        .generate("Древний Рим", 10)
        .await
        .unwrap_err();

    match err {
        QuizError::GenerationService(GenerationServiceError::Status { status, message }) => {
            assert_eq!(status.as_u16(), 401);
            assert_eq!(message, "Incorrect API key provided");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn error_status_without_envelope_uses_reason_phrase() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(500)
        .with_body("upstream exploded")
        .create_async()
        .await;

    let err = generator(server.url()).generate("тема", 5).await.unwrap_err();

    assert!(matches!(
        err,
        QuizError::GenerationService(GenerationServiceError::Status { ref message, .. })
            if message == "Internal Server Error"
    ));
}

#[tokio::test]
async fn missing_generated_text_is_a_malformed_response() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": "chatcmpl-1", "choices": []}"#)
        .create_async()
        .await;

    let err = generator(server.url()).generate("тема", 5).await.unwrap_err();

    assert!(matches!(
        err,
        QuizError::GenerationService(GenerationServiceError::MalformedResponse(_))
    ));
}

#[tokio::test]
async fn prose_instead_of_document_is_malformed() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion("Извините, я не могу составить викторину на эту тему."))
        .create_async()
        .await;

    let err = generator(server.url()).generate("тема", 5).await.unwrap_err();

    assert!(matches!(err, QuizError::MalformedDocument(_)));
}

#[tokio::test]
async fn document_without_valid_questions_is_empty_generation() {
    let mut server = mockito::Server::new_async().await;
    let document = json!({"questions": [{"title": "", "answers": []}]}).to_string();
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion(&document))
        .create_async()
        .await;

    let err = generator(server.url()).generate("тема", 5).await.unwrap_err();

    assert!(matches!(err, QuizError::EmptyGeneration));
}

#[tokio::test]
async fn unreachable_service_is_a_transport_error() {
    let err = generator("http://127.0.0.1:1".into())
        .generate("тема", 5)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        QuizError::GenerationService(GenerationServiceError::Transport(_))
    ));
}
