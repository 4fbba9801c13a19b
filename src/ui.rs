use crate::aggregate::Totals;
use crate::dates::{self, Locale};
use crate::models::{Habit, Statistics};
use crate::state::HabitsScreen;

pub fn render_day(screen: &HabitsScreen, locale: Locale) -> String {
    let date = screen.selected_date();
    let marker = if screen.is_viewing_today() { " (today)" } else { "" };
    let mut out = format!("{}{marker}\n", dates::format(date, locale));
    out.push_str(&format!(
        "{}/{} done\n",
        screen.completed_count(),
        screen.habits().len()
    ));

    if screen.habits().is_empty() {
        out.push_str("No habits yet. Add one with `habits add <name>`.\n");
        return out;
    }

    for habit in screen.habits() {
        out.push_str(&render_habit_line(habit, screen.is_completed(&habit.id)));
    }
    out
}

fn render_habit_line(habit: &Habit, completed: bool) -> String {
    let check = if completed { "[x]" } else { "[ ]" };
    let subtitle = habit
        .subtitle()
        .map(|subtitle| format!(" - {subtitle}"))
        .unwrap_or_default();
    format!(
        "{check} {} ({}){subtitle}  [{}]\n",
        habit.name, habit.frequency, habit.id
    )
}

pub fn render_statistics(entries: &[(Habit, Statistics)], totals: Totals) -> String {
    let mut out = format!(
        "Active habits:     {}\nTotal completions: {}\nBest streak:       {}\n",
        totals.active_habits_count, totals.total_completions, totals.max_streak
    );

    if entries.is_empty() {
        out.push_str("\nNo statistics available.\n");
        return out;
    }

    let width = entries
        .iter()
        .map(|(habit, _)| habit.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Habit".len());
    out.push_str(&format!(
        "\n{:<width$}  {:>5}  {:>7}  {:>7}\n",
        "Habit", "Total", "Current", "Longest"
    ));
    for (habit, stats) in entries {
        out.push_str(&format!(
            "{:<width$}  {:>5}  {:>7}  {:>7}\n",
            habit.name, stats.total_completions, stats.current_streak, stats.longest_streak
        ));
    }
    out
}
