//! Per-category defaults table.
//!
//! Shared by the validator (missing narrative fields) and the local
//! fallback classifier, so both paths always produce the same text for the
//! same category.

use super::Category;

/// Default narrative for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryProfile {
    pub description: &'static str,
    pub call_to_action: &'static str,
    pub prophecy: &'static str,
}

const WARRIOR: CategoryProfile = CategoryProfile {
    description: "Ты действуешь прямо и решительно. Там, где другие сомневаются, \
                  ты уже сделал первый шаг и ведёшь остальных за собой.",
    call_to_action: "Выбери одну цель на эту неделю и доведи её до конца.",
    prophecy: "Впереди тебя ждёт испытание, которое не решить одной лишь силой. \
               Сохрани решимость, но научись ждать: когда туман рассеется, \
               один точный удар изменит всё.",
};

const MAGE: CategoryProfile = CategoryProfile {
    description: "Ты видишь узоры там, где другие видят хаос. Знание для тебя \
                  одновременно инструмент и источник силы.",
    call_to_action: "Запиши идею, которая давно не даёт тебе покоя, \
                     и поставь первый эксперимент.",
    prophecy: "Старая книга откроется тебе на нужной странице. Формула, \
               над которой ты бьёшься, проще, чем кажется: ответ уже \
               записан на полях твоих прежних попыток.",
};

const SEEKER: CategoryProfile = CategoryProfile {
    description: "Тебя ведёт любопытство. Ты ищешь новые пути и не боишься \
                  свернуть с проторённой дороги.",
    call_to_action: "Сделай сегодня то, чего никогда раньше не пробовал.",
    prophecy: "Дорога, которую ты не планировал, окажется главной. \
               Доверься повороту, который другие пропустят, и за ним \
               ты найдёшь то, что искал дольше всего.",
};

const SHADOW: CategoryProfile = CategoryProfile {
    description: "Ты замечаешь скрытые мотивы и читаешь между строк. Твоя \
                  сила в наблюдении и точном расчёте.",
    call_to_action: "Понаблюдай за одной ситуацией, прежде чем вмешаться, \
                     и запиши, что увидел.",
    prophecy: "То, что скрыто от других, станет для тебя ясным. \
               Молчание окажется сильнее слов, а терпеливый взгляд \
               раскроет тайну, которую давно пытались спрятать.",
};

impl Category {
    /// Default narrative for this category.
    pub fn profile(&self) -> &'static CategoryProfile {
        match self {
            Category::Warrior => &WARRIOR,
            Category::Mage => &MAGE,
            Category::Seeker => &SEEKER,
            Category::Shadow => &SHADOW,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_category_has_non_empty_defaults() {
        for category in Category::ALL {
            let profile = category.profile();
            assert!(!profile.description.trim().is_empty());
            assert!(!profile.call_to_action.trim().is_empty());
            assert!(!profile.prophecy.trim().is_empty());
        }
    }

    #[test]
    fn defaults_are_distinct_per_category() {
        assert_ne!(Category::Warrior.profile(), Category::Shadow.profile());
        assert_ne!(
            Category::Mage.profile().prophecy,
            Category::Seeker.profile().prophecy
        );
    }
}
