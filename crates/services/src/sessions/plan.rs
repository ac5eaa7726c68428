use rand::Rng;
use rand::seq::SliceRandom;
use std::time::Duration;

use quiz_core::model::{
    OptionIndex, PracticeMode, PracticeRange, ProgressMap, Question, QuestionId,
};

/// A question as presented in a session, with options possibly reordered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionQuestion {
    pub question: Question,
    /// Option texts in display order.
    pub display_options: [String; 4],
    /// Display position of the correct option.
    pub display_correct: Option<OptionIndex>,
}

impl SessionQuestion {
    /// Present the options in stored order.
    #[must_use]
    pub fn plain(question: Question) -> Self {
        let display_options = question.options.clone();
        let display_correct = question.correct_index;
        Self {
            question,
            display_options,
            display_correct,
        }
    }

    /// Present the options in a uniformly random order.
    pub fn shuffled<R: Rng + ?Sized>(question: Question, rng: &mut R) -> Self {
        let mut order = OptionIndex::all();
        order.shuffle(rng);

        let display_options =
            std::array::from_fn(|slot| question.option(order[slot]).to_owned());
        let display_correct = question.correct_index.and_then(|correct| {
            order
                .iter()
                .position(|&original| original == correct)
                .and_then(|slot| OptionIndex::new(slot).ok())
        });

        Self {
            question,
            display_options,
            display_correct,
        }
    }

    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.question.id
    }

    /// `None` for unkeyed questions.
    #[must_use]
    pub fn is_correct(&self, selected: OptionIndex) -> Option<bool> {
        self.display_correct.map(|correct| correct == selected)
    }
}

/// Ordered questions for one session plus its optional countdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionPlan {
    pub questions: Vec<SessionQuestion>,
    pub time_limit: Option<Duration>,
}

impl SessionPlan {
    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// Selects and orders the questions for a practice session.
pub struct SessionBuilder<'a> {
    mode: PracticeMode,
    range: Option<&'a PracticeRange>,
}

impl<'a> SessionBuilder<'a> {
    #[must_use]
    pub fn new(mode: PracticeMode) -> Self {
        Self { mode, range: None }
    }

    /// Range parameters. Outside `PracticeMode::Range` only the option
    /// shuffle flag is honored.
    #[must_use]
    pub fn with_range(mut self, range: &'a PracticeRange) -> Self {
        self.range = Some(range);
        self
    }

    /// Build a plan from the stored questions.
    ///
    /// - `Starred` keeps questions whose progress is starred.
    /// - `Wrong` keeps questions whose last graded attempt was wrong.
    /// - `Range` keeps inclusive `number` bounds, then shuffles and truncates
    ///   to `limit` when requested.
    /// - `All` and `Smart` keep everything in stored order.
    ///
    /// An empty plan is a valid result.
    pub fn build<R: Rng + ?Sized>(
        self,
        questions: impl IntoIterator<Item = Question>,
        progress: &ProgressMap,
        rng: &mut R,
    ) -> SessionPlan {
        let mut selected: Vec<Question> = match self.mode {
            PracticeMode::Starred => questions
                .into_iter()
                .filter(|q| progress.get(&q.id).is_some_and(|p| p.starred))
                .collect(),
            PracticeMode::Wrong => questions
                .into_iter()
                .filter(|q| progress.get(&q.id).is_some_and(|p| p.is_wrong()))
                .collect(),
            PracticeMode::Range => match self.range {
                Some(range) => questions
                    .into_iter()
                    .filter(|q| range.contains(q.number))
                    .collect(),
                None => questions.into_iter().collect(),
            },
            PracticeMode::All | PracticeMode::Smart => questions.into_iter().collect(),
        };

        let mut time_limit = None;
        if let (PracticeMode::Range, Some(range)) = (self.mode, self.range) {
            if range.shuffle() {
                selected.shuffle(rng);
            }
            if let Some(limit) = range.limit() {
                selected.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
            }
            time_limit = range.countdown();
        }

        let shuffle_options = self.range.is_some_and(PracticeRange::shuffle_options);
        let questions = selected
            .into_iter()
            .map(|question| {
                if shuffle_options {
                    SessionQuestion::shuffled(question, rng)
                } else {
                    SessionQuestion::plain(question)
                }
            })
            .collect();

        SessionPlan {
            questions,
            time_limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{LastResult, Progress};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashMap;

    fn question(number: u32) -> Question {
        Question::new(
            QuestionId::new(number.to_string()),
            number,
            format!("Question {number}?"),
            ["w", "x", "y", "z"].map(|o| format!("{o}{number}")),
        )
        .unwrap()
    }

    fn bank(count: u32) -> Vec<Question> {
        (1..=count).map(question).collect()
    }

    fn numbers(plan: &SessionPlan) -> Vec<u32> {
        plan.questions.iter().map(|q| q.question.number).collect()
    }

    fn rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    #[test]
    fn range_selects_inclusive_bounds() {
        let range = PracticeRange::new(10, 20);
        let plan = SessionBuilder::new(PracticeMode::Range)
            .with_range(&range)
            .build(bank(100), &ProgressMap::new(), &mut rng(1));

        assert_eq!(plan.total(), 11);
        assert_eq!(numbers(&plan), (10..=20).collect::<Vec<_>>());
        assert_eq!(plan.time_limit, None);
    }

    #[test]
    fn inverted_range_is_empty() {
        let range = PracticeRange::new(20, 10);
        let plan = SessionBuilder::new(PracticeMode::Range)
            .with_range(&range)
            .build(bank(30), &ProgressMap::new(), &mut rng(1));
        assert!(plan.is_empty());
    }

    #[test]
    fn range_mode_without_range_keeps_everything() {
        let plan = SessionBuilder::new(PracticeMode::Range).build(
            bank(5),
            &ProgressMap::new(),
            &mut rng(1),
        );
        assert_eq!(numbers(&plan), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn limit_applies_after_shuffle() {
        let range = PracticeRange::new(1, 50).with_shuffle(true).with_limit(5);
        let plan = SessionBuilder::new(PracticeMode::Range)
            .with_range(&range)
            .build(bank(100), &ProgressMap::new(), &mut rng(7));

        assert_eq!(plan.total(), 5);
        assert!(numbers(&plan).iter().all(|n| (1..=50).contains(n)));
        assert_ne!(numbers(&plan), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn same_seed_same_order() {
        let range = PracticeRange::new(1, 30).with_shuffle(true);
        let build = |seed| {
            SessionBuilder::new(PracticeMode::Range)
                .with_range(&range)
                .build(bank(30), &ProgressMap::new(), &mut rng(seed))
        };
        assert_eq!(numbers(&build(42)), numbers(&build(42)));
    }

    #[test]
    fn time_limit_only_in_range_mode() {
        let range = PracticeRange::new(1, 3).with_time_limit_minutes(2);
        let timed = SessionBuilder::new(PracticeMode::Range)
            .with_range(&range)
            .build(bank(3), &ProgressMap::new(), &mut rng(1));
        assert_eq!(timed.time_limit, Some(Duration::from_secs(120)));

        let untimed = SessionBuilder::new(PracticeMode::All)
            .with_range(&range)
            .build(bank(3), &ProgressMap::new(), &mut rng(1));
        assert_eq!(untimed.time_limit, None);
        assert_eq!(untimed.total(), 3);
    }

    #[test]
    fn non_range_mode_ignores_bounds_but_shuffles_options() {
        let range = PracticeRange::new(2, 2)
            .with_limit(1)
            .with_shuffle_options(true);
        let questions: Vec<_> = bank(4)
            .into_iter()
            .map(|q| q.with_correct_index(OptionIndex::new(0).unwrap()))
            .collect();
        let plan = SessionBuilder::new(PracticeMode::All)
            .with_range(&range)
            .build(questions, &ProgressMap::new(), &mut rng(3));

        assert_eq!(plan.total(), 4);
        for item in &plan.questions {
            let correct = item.display_correct.unwrap();
            assert_eq!(
                item.display_options[correct.value()],
                item.question.correct_option().unwrap()
            );
        }
    }

    #[test]
    fn starred_and_wrong_filters() {
        let mut progress = ProgressMap::new();
        progress.insert(
            QuestionId::new("2"),
            Progress {
                starred: true,
                ..Progress::default()
            },
        );
        progress.insert(
            QuestionId::new("3"),
            Progress {
                attempts: 2,
                last_result: LastResult::Wrong,
                ..Progress::default()
            },
        );
        progress.insert(
            QuestionId::new("4"),
            Progress {
                attempts: 1,
                correct_attempts: 1,
                last_result: LastResult::Correct,
                starred: true,
                ..Progress::default()
            },
        );

        let starred =
            SessionBuilder::new(PracticeMode::Starred).build(bank(5), &progress, &mut rng(1));
        assert_eq!(numbers(&starred), vec![2, 4]);

        let wrong = SessionBuilder::new(PracticeMode::Wrong).build(bank(5), &progress, &mut rng(1));
        assert_eq!(numbers(&wrong), vec![3]);

        let smart = SessionBuilder::new(PracticeMode::Smart).build(bank(5), &progress, &mut rng(1));
        assert_eq!(smart.total(), 5);
    }

    #[test]
    fn option_shuffle_keeps_correct_content() {
        for seed in 0..50 {
            for correct in OptionIndex::all() {
                let original = question(1).with_correct_index(correct);
                let shown = SessionQuestion::shuffled(original.clone(), &mut rng(seed));

                let mut sorted = shown.display_options.to_vec();
                sorted.sort();
                let mut expected = original.options.to_vec();
                expected.sort();
                assert_eq!(sorted, expected);

                let slot = shown.display_correct.unwrap();
                assert_eq!(
                    shown.display_options[slot.value()],
                    original.option(correct)
                );
                assert_eq!(shown.is_correct(slot), Some(true));
            }
        }
    }

    #[test]
    fn unkeyed_questions_stay_unkeyed_when_shuffled() {
        let shown = SessionQuestion::shuffled(question(1), &mut rng(9));
        assert_eq!(shown.display_correct, None);
        assert_eq!(shown.is_correct(OptionIndex::new(0).unwrap()), None);
    }

    #[test]
    fn question_shuffle_is_roughly_uniform() {
        let range = PracticeRange::new(1, 3).with_shuffle(true);
        let mut counts: HashMap<Vec<u32>, u32> = HashMap::new();
        let mut generator = rng(2024);
        for _ in 0..6000 {
            let plan = SessionBuilder::new(PracticeMode::Range)
                .with_range(&range)
                .build(bank(3), &ProgressMap::new(), &mut generator);
            *counts.entry(numbers(&plan)).or_default() += 1;
        }

        assert_eq!(counts.len(), 6);
        for (order, count) in counts {
            assert!((800..1200).contains(&count), "{order:?} seen {count} times");
        }
    }
}
