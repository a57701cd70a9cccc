use botprov_core::AppError;
use dialoguer::Input;

/// Only an explicit `y`/`Y` counts as consent; anything else, blank included, declines.
pub fn is_affirmative(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}

/// Ask a yes/no question defaulting to "no".
pub fn confirm(question: &str) -> Result<bool, AppError> {
    let answer: String = Input::new()
        .with_prompt(format!("{question} [y/N]"))
        .allow_empty(true)
        .interact_text()
        .map_err(|e| AppError::Prompt(e.to_string()))?;
    Ok(is_affirmative(&answer))
}

/// Block until the operator presses Enter.
pub fn pause(message: &str) -> Result<(), AppError> {
    let _: String = Input::new()
        .with_prompt(message)
        .allow_empty(true)
        .interact_text()
        .map_err(|e| AppError::Prompt(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::is_affirmative;

    #[test]
    fn only_single_y_is_consent() {
        assert!(is_affirmative("y"));
        assert!(is_affirmative("Y"));
        assert!(is_affirmative(" y\n"));
        for answer in ["", "n", "N", "yes", "yy", "sure", " "] {
            assert!(!is_affirmative(answer), "{answer:?} treated as yes");
        }
    }
}
