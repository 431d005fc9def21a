use teloxide::{
    dispatching::{UpdateFilterExt, UpdateHandler},
    dptree,
    types::Update,
};
use tracing::instrument;

use crate::{
    commands::{cancel, help, start, Command},
    generator::QuestionGenerator,
    runner,
};

/// Dispatch tree: commands first, every other message goes to the quiz flow.
///
/// Expects `Arc<SessionRegistry>`, `Arc<QuestionGenerator>` and `Arc<QuizConfig>`
/// among the dispatcher dependencies.
#[instrument(level = "debug")]
pub fn schema() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    use dptree::case;
    log::debug!("Building the dispatching tree");

    let command_handler = teloxide::filter_command::<Command, _>()
        .branch(case![Command::Help].endpoint(help))
        .branch(case![Command::Start].endpoint(start))
        .branch(case![Command::Cancel].endpoint(cancel));

    Update::filter_message()
        .branch(command_handler)
        .endpoint(runner::handle_text::<QuestionGenerator>)
}
