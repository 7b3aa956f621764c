//! Bundled prompt catalog, shared read-only by every game instance.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Funny,
    Philosophical,
    Social,
    Wild,
}

/// A two-option dilemma
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    pub option_a: &'static str,
    pub option_b: &'static str,
    pub category: Category,
}

const fn prompt(option_a: &'static str, option_b: &'static str, category: Category) -> Prompt {
    Prompt {
        option_a,
        option_b,
        category,
    }
}

use Category::*;

pub static PROMPTS: &[Prompt] = &[
    // funny
    prompt("Always have to sing instead of speak", "Always have to dance instead of walk", Funny),
    prompt("Have a rewind button for your life", "Have a pause button for your life", Funny),
    prompt("Sneeze confetti", "Hiccup bubbles", Funny),
    prompt("Have fingers as long as your legs", "Have legs as short as your fingers", Funny),
    prompt("Only be able to whisper", "Only be able to shout", Funny),
    prompt("Have a personal theme song that plays when you enter a room", "Have a laugh track that follows your jokes", Funny),
    prompt("Eat only pizza forever", "Never eat pizza again", Funny),
    prompt("Have a pet dinosaur the size of a cat", "Have a pet cat the size of a dinosaur", Funny),
    prompt("Always smell like fresh cookies", "Always smell like a new car", Funny),
    prompt("Talk like a pirate for a year", "Talk like Shakespeare for a year", Funny),
    // philosophical
    prompt("Know the date of your death", "Know the cause of your death", Philosophical),
    prompt("Be able to change the past", "Be able to see the future", Philosophical),
    prompt("Live a short life full of adventure", "Live a long life of quiet comfort", Philosophical),
    prompt("Have all the answers", "Have all the questions that matter", Philosophical),
    prompt("Be remembered for something bad", "Be forgotten entirely", Philosophical),
    prompt("Lose all your memories", "Never be able to make new ones", Philosophical),
    prompt("Be feared by everyone", "Be pitied by everyone", Philosophical),
    prompt("Know every truth about the universe", "Be perfectly happy without knowing", Philosophical),
    prompt("Relive the same day forever", "Skip ahead ten years right now", Philosophical),
    prompt("Be the smartest person alive", "Be the kindest person alive", Philosophical),
    // social
    prompt("Always say what you think", "Never speak again", Social),
    prompt("Have a thousand acquaintances", "Have one true friend", Social),
    prompt("Be famous but lonely", "Be unknown but loved", Social),
    prompt("Read everyone's mind", "Have everyone read yours", Social),
    prompt("Never use social media again", "Never watch another movie or show", Social),
    prompt("Always be ten minutes late", "Always be twenty minutes early", Social),
    prompt("Host every party", "Never be invited to one", Social),
    prompt("Have your search history made public", "Have your messages made public", Social),
    prompt("Give a speech to a stadium", "Sing alone at a wedding", Social),
    prompt("Be the funniest person in the room", "Be the most interesting person in the room", Social),
    // wild
    prompt("Fight one horse-sized duck", "Fight a hundred duck-sized horses", Wild),
    prompt("Be able to fly but only at walking speed", "Be able to teleport but only a meter at a time", Wild),
    prompt("Live on the Moon", "Live at the bottom of the ocean", Wild),
    prompt("Breathe underwater", "Survive in outer space", Wild),
    prompt("Control fire", "Control water", Wild),
    prompt("Be invisible whenever you want", "Be able to read any book in a second", Wild),
    prompt("Have a dragon as a pet", "Be a dragon once a week", Wild),
    prompt("Explore space", "Explore the deep sea", Wild),
    prompt("Talk to animals", "Speak every human language", Wild),
    prompt("Travel a thousand years into the past", "Travel a thousand years into the future", Wild),
];
