//! Built-in themes and the character roster

use serde::Serialize;

/// A level of the sandbox: its goal text, target and starting character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Theme {
    pub id: u32,
    pub title: &'static str,
    pub goal: &'static str,
    pub target_glyph: &'static str,
    pub initial_character: &'static str,
}

pub static THEMES: [Theme; 6] = [
    Theme {
        id: 1,
        title: "Dance Party",
        goal: "Make the cat dance to the music note!",
        target_glyph: "🎵",
        initial_character: "🐱",
    },
    Theme {
        id: 2,
        title: "Interactive Story",
        goal: "Introduce yourself to the dragon!",
        target_glyph: "🐲",
        initial_character: "👧",
    },
    Theme {
        id: 3,
        title: "Bouncer",
        goal: "Glide to the hoop to score points!",
        target_glyph: "🏀",
        initial_character: "⛹️",
    },
    Theme {
        id: 4,
        title: "Collector",
        goal: "Collect all the hidden gems!",
        target_glyph: "💎",
        initial_character: "🦊",
    },
    Theme {
        id: 5,
        title: "Space Maze",
        goal: "Navigate the rocket to the star!",
        target_glyph: "🌟",
        initial_character: "🚀",
    },
    Theme {
        id: 6,
        title: "Showcase",
        goal: "Create your own creative sequence!",
        target_glyph: "🎨",
        initial_character: "🦄",
    },
];

/// Every character kind in unlock order
pub static CHARACTERS: [&str; 12] = [
    "🐱", "🐶", "🦄", "🦖", "🤖", "🦊", "🐼", "🦁", "🚀", "⛹️", "👧", "🎨",
];

/// The theme a fresh session starts with
pub fn default_theme() -> &'static Theme {
    &THEMES[0]
}

pub fn theme(id: u32) -> Option<&'static Theme> {
    THEMES.iter().find(|t| t.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_lookup() {
        assert_eq!(theme(3).map(|t| t.title), Some("Bouncer"));
        assert!(theme(0).is_none());
        assert!(theme(7).is_none());
    }

    #[test]
    fn test_theme_ids_are_sequential() {
        for (i, t) in THEMES.iter().enumerate() {
            assert_eq!(t.id as usize, i + 1);
        }
    }

    #[test]
    fn test_every_initial_character_is_in_roster() {
        for t in &THEMES {
            assert!(CHARACTERS.contains(&t.initial_character), "{}", t.title);
        }
    }
}
