//! Recipes shipped with the crate

use super::{Recipe, RecipeStep};

pub const CHICKEN_CURRY_ID: &str = "chicken-curry-builtin";

pub fn chicken_curry() -> Recipe {
    let steps: [(&str, &str, Option<u32>); 16] = [
        ("🔥", "Heat 4 tbsp cooking oil.", None),
        ("🧂", "Add 1/4 tsp salt and 1/4 tsp turmeric to the oil.", None),
        ("🥔", "Fry 2 medium potatoes (cut into chunks), then remove and set aside.", None),
        ("🧅", "Add 2 medium thinly sliced onions to the oil.", None),
        (
            "🌿",
            "Add 1/2 tsp salt, 7 cardamoms, 2 small cinnamon sticks, 8 cloves, 3 bay leaves, and 8-10 peppercorns. Fry until brown.",
            None,
        ),
        ("🫚", "Add 1 tbsp ginger paste.", None),
        ("🍗", "Add 1 kg chicken.", None),
        (
            "🌶️",
            "Add 3/4 tsp turmeric, 1/2 tsp red chili powder, 1 tsp Kashmiri red chili, and 1 tsp salt (to taste).",
            None,
        ),
        ("⏱️", "Sauté for 5 minutes on medium heat.", Some(300)),
        ("🫕", "Cover and cook for 5 minutes on low heat.", Some(300)),
        (
            "🌿",
            "Uncover and add 1½ tsp coriander powder, 1 tsp cumin powder, and 1/2 tsp garam masala.",
            None,
        ),
        ("🔥", "Cover and cook for 10 minutes on low heat, stirring occasionally.", Some(600)),
        ("🥔", "Uncover and add the fried potatoes.", None),
        ("💧", "Pour in 2 cups hot water.", None),
        ("🫕", "Cover and cook for 12-15 minutes on low heat.", Some(780)),
        ("✅", "Add 1/4 tsp roasted cumin and a small pinch of sugar. Serve hot.", None),
    ];

    Recipe {
        id: CHICKEN_CURRY_ID.to_string(),
        name: "Chicken Curry".to_string(),
        emoji: "🍗".to_string(),
        description: "A rich and aromatic chicken curry with whole spices, ginger, and fried potatoes."
            .to_string(),
        steps: steps
            .into_iter()
            .zip(1..)
            .map(|((emoji, description, timer_duration), id)| RecipeStep {
                id,
                description: description.to_string(),
                emoji: Some(emoji.to_string()),
                timer_duration,
            })
            .collect(),
    }
}
