#![deny(clippy::all, clippy::pedantic)]

pub mod categories;
pub mod posts;
pub mod session;

use postdesk::application::posts::MutationOutcome;

use crate::client::CliError;

/// Map a reported-not-returned mutation result onto the exit status.
pub(crate) fn finish(outcome: MutationOutcome, action: &'static str) -> Result<(), CliError> {
    match outcome {
        MutationOutcome::Applied => Ok(()),
        MutationOutcome::Declined => {
            eprintln!("cancelled");
            Ok(())
        }
        MutationOutcome::Failed => Err(CliError::Mutation(action)),
    }
}
