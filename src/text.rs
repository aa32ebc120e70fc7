//! Every string the bot sends or matches on.
//!
//! Dispatch never compares against inline literals; the router and the
//! dialogue pull from here, so a label change lands in exactly one place.

use crate::db::{Training, TrainingStats};

/// Menu button labels. These exact strings come back as message text when
/// a button is tapped, so they double as routing keys.
pub mod menu {
    pub const ADD: &str = "➕ Додати";
    pub const RECENT: &str = "📋 Останні";
    pub const STATS: &str = "📊 Статистика";
    pub const MOTIVATE: &str = "💡 Мотивація";
    pub const CLEAR: &str = "🗑 Очистити";
}

pub const START_COMMAND: &str = "/start";
pub const CANCEL_COMMAND: &str = "/cancel";

pub const GREETING: &str = "Привіт! Вибери дію з меню нижче:";
pub const DATE_PROMPT: &str = "📅 Введи дату тренування (напр. 2025-05-20):";
pub const KIND_PROMPT: &str = "🏋️ Тип тренування:";
pub const DURATION_PROMPT: &str = "⏱ Тривалість у хвилинах:";
pub const NOT_A_NUMBER: &str = "⚠️ Введи число.";
pub const SAVED: &str = "✅ Тренування збережено!";
pub const NO_TRAININGS: &str = "У тебе ще немає тренувань.";
pub const CLEARED: &str = "🗑 Всі тренування видалено.";
pub const CANCELLED: &str = "Скасовано.";
pub const UNRECOGNIZED: &str = "Команда не розпізнана.";
pub const STORE_FAILURE: &str = "⚠️ Щось пішло не так. Спробуй ще раз.";

pub const MOTIVATIONS: [&str; 5] = [
    "Не зупиняйся, навіть якщо важко.",
    "Твоє тіло працює — і результати не за горами.",
    "Кожне тренування наближає тебе до мети.",
    "Зроби сьогодні те, за що завтра подякуєш собі.",
    "Сила в регулярності — не здавайся.",
];

pub fn motivation_reply(quote: &str) -> String {
    format!("💡 {quote}")
}

/// Header plus one line per training, newest first as given.
pub fn recent_reply(trainings: &[Training]) -> String {
    let mut reply = String::from("📋 Останні тренування:\n");
    for training in trainings {
        reply.push_str(&format!(
            "{} — {}, {} хв\n",
            training.date, training.kind, training.duration
        ));
    }
    reply
}

/// Totals block, followed by the per-kind breakdown when any rows exist.
pub fn stats_reply(stats: &TrainingStats) -> String {
    let mut reply = format!(
        "📊 Всього тренувань: {}\n🕒 Загальна тривалість: {} хв\n",
        stats.sessions, stats.total_minutes
    );
    if !stats.by_kind.is_empty() {
        reply.push_str("\nТипи тренувань:\n");
        for (kind, count) in &stats.by_kind {
            reply.push_str(&format!("– {kind}: {count}\n"));
        }
    }
    reply
}
