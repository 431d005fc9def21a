use std::sync::Arc;

use teloxide::{
    payloads::SendMessageSetters,
    prelude::Requester,
    types::{ChatId, Message},
    Bot,
};
use tracing::instrument;

use crate::{
    config::QuizConfig,
    error::QuizError,
    generator::{notify_then_generate, GenerateQuestions},
    keyboard::{letters_keyboard, next_keyboard, remove_keyboard, start_keyboard},
    registry::SessionRegistry,
    replies::{self, NEXT_BUTTON, START_BUTTON},
    session::{QuizSession, SessionState},
    HandlerResult,
};

/// Entry point for every non-command text message.
///
/// The chat's session stays locked for the whole update, generation included, so a
/// second message from the same chat waits until this one is done.
#[instrument(level = "info", skip_all, fields(chat = msg.chat.id.0))]
pub(crate) async fn handle_text<G>(
    bot: Bot,
    msg: Message,
    registry: Arc<SessionRegistry>,
    generator: Arc<G>,
    config: Arc<QuizConfig>,
) -> HandlerResult
where
    G: GenerateQuestions + Send + Sync + 'static,
{
    let chat_id = msg.chat.id;
    let Some(text) = msg.text().map(str::trim) else {
        bot.send_message(chat_id, replies::TEXT_ONLY).await?;
        return Ok(());
    };

    let mut session = registry.lock(chat_id).await;

    match session.state() {
        SessionState::Empty => {
            receive_topic(
                &bot,
                chat_id,
                text,
                &mut session,
                &registry,
                generator.as_ref(),
                config.question_count,
            )
            .await
        }
        // A letter sent before the question was shown only brings the question up.
        SessionState::InProgress
            if text == START_BUTTON || text == NEXT_BUTTON || !session.is_presented() =>
        {
            present_question(&bot, chat_id, &mut session, &registry).await
        }
        SessionState::InProgress => take_answer(&bot, chat_id, text, &mut session, &registry).await,
        SessionState::Complete => finish(&bot, chat_id, &session, &registry).await,
    }
}

async fn receive_topic<G: GenerateQuestions>(
    bot: &Bot,
    chat_id: ChatId,
    topic: &str,
    session: &mut QuizSession,
    registry: &SessionRegistry,
    generator: &G,
    count: usize,
) -> HandlerResult {
    if topic.is_empty() {
        bot.send_message(chat_id, replies::ASK_TOPIC).await?;
        return Ok(());
    }

    log::info!("Chat {} provided topic '{}'", chat_id.0, topic);
    let notice = async {
        bot.send_message(chat_id, replies::GENERATING)
            .reply_markup(remove_keyboard())
            .await
            .map(|_| ())
    };

    let attached = notify_then_generate(generator, topic, count, notice)
        .await
        .and_then(|questions| session.attach_questions(questions));

    match attached {
        Ok(()) => {
            log::info!(
                "Session {} ready with {} questions on '{}'",
                session.id(),
                session.total(),
                topic
            );
            bot.send_message(chat_id, replies::quiz_ready(topic, session.total()))
                .reply_markup(start_keyboard())
                .await?;
        }
        Err(e) => {
            log::error!("Failed to build a quiz on '{}' for chat {}: {}", topic, chat_id.0, e);
            registry.remove(chat_id);
            bot.send_message(chat_id, replies::generation_failed(topic))
                .await?;
        }
    }

    Ok(())
}

async fn present_question(
    bot: &Bot,
    chat_id: ChatId,
    session: &mut QuizSession,
    registry: &SessionRegistry,
) -> HandlerResult {
    let view = match session.current_question_view() {
        Ok(view) => view,
        Err(e) => return abort(bot, chat_id, registry, e).await,
    };

    log::info!(
        "Session {}: asking question #{} of {}",
        session.id(),
        view.number,
        session.total()
    );
    bot.send_message(chat_id, replies::question(view.number, &view.text))
        .reply_markup(letters_keyboard(&view.letters))
        .await?;

    if let Err(e) = session.mark_presented() {
        return abort(bot, chat_id, registry, e).await;
    }
    Ok(())
}

async fn take_answer(
    bot: &Bot,
    chat_id: ChatId,
    text: &str,
    session: &mut QuizSession,
    registry: &SessionRegistry,
) -> HandlerResult {
    let outcome = match session.submit_answer(text) {
        Ok(outcome) => outcome,
        Err(e) => return abort(bot, chat_id, registry, e).await,
    };

    log::info!(
        "Session {}: answer '{}' correct: {}, score {}/{}",
        session.id(),
        text,
        outcome.correct,
        session.score(),
        session.cursor()
    );
    bot.send_message(chat_id, replies::feedback(&outcome)).await?;

    if session.is_complete() {
        finish(bot, chat_id, session, registry).await
    } else {
        bot.send_message(chat_id, replies::PRESS_NEXT)
            .reply_markup(next_keyboard())
            .await?;
        Ok(())
    }
}

async fn finish(
    bot: &Bot,
    chat_id: ChatId,
    session: &QuizSession,
    registry: &SessionRegistry,
) -> HandlerResult {
    log::info!(
        "Quiz completed for chat {}. Score: {}/{}",
        chat_id.0,
        session.score(),
        session.total()
    );
    registry.remove(chat_id);

    bot.send_message(chat_id, replies::completed(session.score(), session.total()))
        .reply_markup(remove_keyboard())
        .await?;
    bot.send_message(chat_id, replies::RESTART_HINT).await?;
    Ok(())
}

async fn abort(
    bot: &Bot,
    chat_id: ChatId,
    registry: &SessionRegistry,
    error: QuizError,
) -> HandlerResult {
    log::error!("Invalid session operation for chat {}: {}", chat_id.0, error);
    registry.remove(chat_id);
    bot.send_message(chat_id, replies::INTERNAL_ERROR)
        .reply_markup(remove_keyboard())
        .await?;
    Ok(())
}
