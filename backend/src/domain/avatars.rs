//! Built-in kid avatars and their pastel palettes.

use once_cell::sync::Lazy;
use shared::{AvatarCategory, ColorPalette, KidAvatar};

fn pink() -> ColorPalette {
    ColorPalette {
        name: "Sweet Pink".to_string(),
        primary: "#FFB3D9".to_string(),
        secondary: "#FFC9E1".to_string(),
        accent: "#FF9BAA".to_string(),
        background: "#FFF5F8".to_string(),
        surface: "#FFFFFF".to_string(),
        text: "#8B5A7A".to_string(),
        gradient: "linear-gradient(135deg, #FFB3D9 0%, #FFC9E1 50%, #FFE1EC 100%)".to_string(),
        shadow: "rgba(255, 179, 217, 0.3)".to_string(),
    }
}

fn blue() -> ColorPalette {
    ColorPalette {
        name: "Clear Sky".to_string(),
        primary: "#A8D8F0".to_string(),
        secondary: "#C2E5F7".to_string(),
        accent: "#6C8CFF".to_string(),
        background: "#F0F8FF".to_string(),
        surface: "#FFFFFF".to_string(),
        text: "#4A6B8A".to_string(),
        gradient: "linear-gradient(135deg, #A8D8F0 0%, #C2E5F7 50%, #E1F2FA 100%)".to_string(),
        shadow: "rgba(168, 216, 240, 0.3)".to_string(),
    }
}

fn green() -> ColorPalette {
    ColorPalette {
        name: "Fresh Meadow".to_string(),
        primary: "#B8E6B8".to_string(),
        secondary: "#D1F2D1".to_string(),
        accent: "#7ED8A4".to_string(),
        background: "#F0FFF0".to_string(),
        surface: "#FFFFFF".to_string(),
        text: "#5A8B5A".to_string(),
        gradient: "linear-gradient(135deg, #B8E6B8 0%, #D1F2D1 50%, #E8F8E8 100%)".to_string(),
        shadow: "rgba(184, 230, 184, 0.3)".to_string(),
    }
}

fn yellow() -> ColorPalette {
    ColorPalette {
        name: "Gentle Sun".to_string(),
        primary: "#FFE4B8".to_string(),
        secondary: "#FFEFD1".to_string(),
        accent: "#FFD47A".to_string(),
        background: "#FFFCF0".to_string(),
        surface: "#FFFFFF".to_string(),
        text: "#B8860B".to_string(),
        gradient: "linear-gradient(135deg, #FFE4B8 0%, #FFEFD1 50%, #FFF8E8 100%)".to_string(),
        shadow: "rgba(255, 228, 184, 0.3)".to_string(),
    }
}

fn avatar(id: &str, name: &str, emoji: &str, category: AvatarCategory, palette: ColorPalette) -> KidAvatar {
    KidAvatar {
        id: id.to_string(),
        name: name.to_string(),
        emoji: emoji.to_string(),
        category,
        palette,
    }
}

/// The selectable avatars, one palette each.
pub static PREDEFINED_AVATARS: Lazy<Vec<KidAvatar>> = Lazy::new(|| {
    vec![
        avatar("bunny", "Bunny", "🐰", AvatarCategory::Animals, pink()),
        avatar("puppy", "Puppy", "🐶", AvatarCategory::Animals, blue()),
        avatar("unicorn", "Unicorn", "🦄", AvatarCategory::Fantasy, pink()),
        avatar("dragon", "Dragon", "🐉", AvatarCategory::Fantasy, green()),
        avatar("star", "Star", "⭐", AvatarCategory::Classic, yellow()),
        avatar("rocket", "Rocket", "🚀", AvatarCategory::Classic, blue()),
        avatar("flower", "Flower", "🌸", AvatarCategory::Nature, pink()),
        avatar("tree", "Tree", "🌳", AvatarCategory::Nature, green()),
    ]
});

/// Look up an avatar by ID.
pub fn avatar_by_id(id: &str) -> Option<&'static KidAvatar> {
    PREDEFINED_AVATARS.iter().find(|a| a.id == id)
}

/// Avatar assigned to the n-th child during default family setup.
pub fn avatar_for_index(index: usize) -> &'static KidAvatar {
    &PREDEFINED_AVATARS[index % PREDEFINED_AVATARS.len()]
}

/// The neutral palette used when no kid profile is active.
pub fn default_palette() -> ColorPalette {
    blue()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_avatar_lookup() {
        assert_eq!(avatar_by_id("bunny").unwrap().emoji, "🐰");
        assert!(avatar_by_id("ghost").is_none());
    }

    #[test]
    fn test_avatar_cycle_wraps() {
        let count = PREDEFINED_AVATARS.len();
        assert_eq!(avatar_for_index(0).id, avatar_for_index(count).id);
    }
}
