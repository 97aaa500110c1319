use super::dto::Profile;
use rand::Rng;
use rand::rngs::SmallRng;
use rand::SeedableRng;

const NAMES: &[&str] = &[
    "Maverick", "Luna", "Ace", "Penny", "Dutch", "Sadie", "Ringo", "Clover", "Bluff", "Marble",
    "Dice", "Scout", "Tilt", "River", "Vegas", "Queenie", "Rusty", "Domino", "Stacks", "Juniper",
];

const EMOJIS: &[&str] = &[
    "🦊", "🐼", "🦁", "🐸", "🦉", "🐙", "🦄", "🐯", "🐺", "🦝", "🐨", "🦅", "🐢", "🦈", "🐴",
    "🦜", "🐻", "🦫", "🐊", "🦚",
];

/// A random name/emoji pair for players who cannot be bothered.
pub fn random_profile() -> Profile {
    let mut rng = SmallRng::from_os_rng();
    Profile {
        name: NAMES[rng.random_range(0..NAMES.len())].to_string(),
        emoji: EMOJIS[rng.random_range(0..EMOJIS.len())].to_string(),
    }
}
