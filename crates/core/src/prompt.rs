use crate::types::{GenerationStyle, Transform};

/// System and user messages sent to the model for one transformation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

fn voice_guide(style: GenerationStyle) -> &'static str {
    match style {
        GenerationStyle::GenZ => {
            "casual internet slang like \"no cap\", \"bussin\", \"fr fr\", \"slay\" and \"it's giving\", lowercase energy, emojis welcome"
        }
        GenerationStyle::Millennial => {
            "self-aware irony, \"adulting\", avocado toast, brunch, 2000s pop-culture references and a hint of burnout"
        }
        GenerationStyle::Boomer => {
            "formal Capitalized Sentences, \"back in my day\", distrust of newfangled things and advice nobody asked for"
        }
    }
}

/// Build the model prompt for a validated transformation.
///
/// The output depends only on the input: the same code, style and language
/// always produce the same bytes.
pub fn build_prompt(transform: &Transform) -> Prompt {
    let Transform {
        code,
        style,
        language,
    } = transform;

    let system = format!(
        "\
You are a code style transformer. You rewrite {language} code in the voice of the {style} generation.

Rules:
- Keep the exact same functionality and formatting as the original code.
- Rename variables and functions and rewrite comments so they sound like {style}: {voice}.
- Keep the code valid {language}.
- Output the transformed {language} code only. No markdown fences. No explanations. No commentary.",
        voice = voice_guide(*style),
    );

    let user = format!(
        "\
Transform this {language} code into {style} generational speaking style.
Maintain the same functionality and formatting, but add comments and variable names that reflect the speaking style of {style}.
Original code:
{code}"
    );

    Prompt { system, user }
}
