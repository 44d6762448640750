//! Central exam orchestrator.
//!
//! Runs one session loop per examiner plus a reporting loop as cooperative
//! tasks over a single shared lock. The lock covers every compound step
//! that touches the student queue, the question bank, or the statistics,
//! and is never held across a timed suspension.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{FuturesUnordered, StreamExt};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::answer::check_answer;
use crate::error::ExamError;
use crate::person::Person;
use crate::report::ExamReport;
use crate::statistics::ExamStatistics;
use crate::traits::SnapshotSink;

/// Questions sampled per session; also the minimum size of the bank.
pub const QUESTIONS_PER_SESSION: usize = 3;

/// Accumulated working time that sends an examiner to lunch, in seconds.
pub const LUNCH_THRESHOLD: f64 = 30.0;

/// Lunch duration range, in seconds.
const LUNCH_SECS: std::ops::Range<f64> = 12.0..18.0;

/// Forced-outcome noise over the majority rule: a uniform draw below
/// `FORCE_FAIL_BELOW` fails the session outright, below `FORCE_PASS_BELOW`
/// passes it outright.
const FORCE_FAIL_BELOW: f64 = 0.125;
const FORCE_PASS_BELOW: f64 = 0.25;

/// Raw roster input as produced by a data loader: name pairs plus the
/// question bank.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    pub students: Vec<(String, String)>,
    pub examiners: Vec<(String, String)>,
    pub questions: Vec<String>,
}

/// Configuration for the exam engine.
#[derive(Debug, Clone)]
pub struct ExamEngineConfig {
    /// How often the reporting task re-checks the statistics.
    pub poll_interval: Duration,
    /// Master seed; `None` seeds each run from entropy.
    pub seed: Option<u64>,
}

impl Default for ExamEngineConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            seed: None,
        }
    }
}

/// State behind the single shared lock.
struct Shared {
    students: VecDeque<Person>,
    questions: Vec<String>,
    stats: ExamStatistics,
}

/// The exam engine.
pub struct ExamEngine {
    config: ExamEngineConfig,
}

impl ExamEngine {
    pub fn new(config: ExamEngineConfig) -> Self {
        Self { config }
    }

    /// Run the whole exam: validate the roster, race the session loops
    /// against the reporting loop, and return the final report.
    ///
    /// A failing session loop does not stop its siblings; the first error
    /// propagates after every task has finished.
    pub async fn run(
        &self,
        roster: Roster,
        sink: &dyn SnapshotSink,
    ) -> Result<ExamReport, ExamError> {
        if roster.questions.len() < QUESTIONS_PER_SESSION {
            return Err(ExamError::NotEnoughQuestions(roster.questions.len()));
        }
        let examiners = build_persons(&roster.examiners)?;
        let students = build_persons(&roster.students)?;

        let run_id = Uuid::new_v4();
        let base_seed = self.config.seed.unwrap_or_else(|| rand::thread_rng().gen());
        tracing::info!(
            examiners = examiners.len(),
            students = students.len(),
            questions = roster.questions.len(),
            seed = base_seed,
            "starting exam"
        );

        let stats = ExamStatistics::new(&examiners, &students);
        let shared = Arc::new(Mutex::new(Shared {
            students: students.into_iter().collect(),
            questions: roster.questions,
            stats,
        }));

        if examiners.is_empty() {
            // nobody can drain the queue, so report the state as-is
            let guard = shared.lock().await;
            let snapshot = guard.stats.snapshot();
            let report = ExamReport::from_stats(run_id, &guard.stats);
            drop(guard);
            sink.on_complete(&snapshot);
            return Ok(report);
        }

        let stop = Arc::new(AtomicBool::new(false));

        let sessions = {
            let shared = Arc::clone(&shared);
            let stop = Arc::clone(&stop);
            async move {
                let mut tasks = FuturesUnordered::new();
                for (index, examiner) in examiners.into_iter().enumerate() {
                    let shared = Arc::clone(&shared);
                    let rng = ChaCha8Rng::seed_from_u64(base_seed.wrapping_add(index as u64));
                    tasks.push(async move {
                        let name = examiner.to_string();
                        (name, session_loop(examiner, shared, rng).await)
                    });
                }

                let mut first_error = None;
                while let Some((name, result)) = tasks.next().await {
                    if let Err(e) = result {
                        tracing::error!("examiner {name} aborted: {e}");
                        if first_error.is_none() {
                            first_error = Some(ExamError::Session {
                                examiner: name,
                                source: Box::new(e),
                            });
                        }
                    }
                }
                stop.store(true, Ordering::Relaxed);
                first_error
            }
        };

        let reporting = report_loop(
            Arc::clone(&shared),
            self.config.poll_interval,
            Arc::clone(&stop),
            sink,
        );

        let (first_error, ()) = tokio::join!(sessions, reporting);
        if let Some(e) = first_error {
            return Err(e);
        }

        let guard = shared.lock().await;
        Ok(ExamReport::from_stats(run_id, &guard.stats))
    }
}

fn build_persons(pairs: &[(String, String)]) -> Result<Vec<Person>, ExamError> {
    pairs
        .iter()
        .map(|(first, last)| {
            Person::new(first.clone(), last.clone()).map_err(|e| {
                tracing::error!("rejected roster entry {first:?} {last:?}: {e}");
                e
            })
        })
        .collect()
}

/// One examiner's session loop: lunch check, dequeue + assign + sample
/// under the lock, quiz rounds, simulated exam time, then the post-exam
/// stats commit under the lock. Ends when the student queue is empty.
async fn session_loop(
    examiner: Person,
    shared: Arc<Mutex<Shared>>,
    mut rng: ChaCha8Rng,
) -> Result<(), ExamError> {
    let name_len = examiner.first_name().chars().count() as f64;
    let mut had_lunch = false;
    let mut on_lunch = false;

    loop {
        let time_worked = {
            let mut guard = shared.lock().await;
            if on_lunch {
                guard.stats.set_on_lunch(&examiner, false);
                on_lunch = false;
            }
            guard.stats.time_worked(&examiner)
        };

        // one lunch per run, the first time the threshold is crossed
        if time_worked >= LUNCH_THRESHOLD && !had_lunch {
            let lunch = rng.gen_range(LUNCH_SECS);
            had_lunch = true;
            on_lunch = true;
            shared.lock().await.stats.set_on_lunch(&examiner, true);
            tracing::debug!(examiner = %examiner, secs = lunch, "lunch break");
            tokio::time::sleep(Duration::from_secs_f64(lunch)).await;
            continue;
        }

        let (student, questions) = {
            let mut guard = shared.lock().await;
            if guard.questions.len() < QUESTIONS_PER_SESSION {
                return Err(ExamError::NotEnoughQuestions(guard.questions.len()));
            }
            let Some(student) = guard.students.pop_front() else {
                guard.stats.assign_student(&examiner, None);
                return Ok(());
            };
            guard.stats.assign_student(&examiner, Some(student.clone()));
            let questions: Vec<String> = guard
                .questions
                .choose_multiple(&mut rng, QUESTIONS_PER_SESSION)
                .cloned()
                .collect();
            (student, questions)
        };

        let duration = rng.gen_range(name_len - 1.0..name_len + 1.0);

        let mut passed_rounds = 0usize;
        for question in &questions {
            if check_answer(&examiner, &student, question, &mut rng) {
                passed_rounds += 1;
                shared.lock().await.stats.record_correct_answer(question);
            }
        }

        let passed = match rng.gen::<f64>() {
            r if r < FORCE_FAIL_BELOW => false,
            r if r < FORCE_PASS_BELOW => true,
            _ => passed_rounds * 2 > QUESTIONS_PER_SESSION,
        };
        tracing::debug!(
            examiner = %examiner,
            student = %student,
            passed,
            rounds = passed_rounds,
            "session decided"
        );

        tokio::time::sleep(Duration::from_secs_f64(duration)).await;

        shared
            .lock()
            .await
            .stats
            .complete_session(&examiner, &student, passed, duration);
    }
}

/// The reporting loop: poll the statistics, push a snapshot whenever the
/// fingerprint changes, and emit one final snapshot when the queue counter
/// reaches zero (or every session task has already stopped).
async fn report_loop(
    shared: Arc<Mutex<Shared>>,
    poll_interval: Duration,
    stop: Arc<AtomicBool>,
    sink: &dyn SnapshotSink,
) {
    let (initial, mut previous) = {
        let guard = shared.lock().await;
        (guard.stats.snapshot(), guard.stats.fingerprint())
    };
    sink.on_snapshot(&initial);

    loop {
        let (changed, finished) = {
            let guard = shared.lock().await;
            let fingerprint = guard.stats.fingerprint();
            let changed = (fingerprint != previous).then(|| guard.stats.snapshot());
            if changed.is_some() {
                previous = fingerprint;
            }
            (changed, guard.stats.students_in_queue() == 0)
        };

        if finished {
            let snapshot = shared.lock().await.stats.snapshot();
            sink.on_complete(&snapshot);
            return;
        }
        if let Some(snapshot) = changed {
            sink.on_snapshot(&snapshot);
        }
        if stop.load(Ordering::Relaxed) {
            // the sessions ended without draining the queue; report what is left
            let snapshot = shared.lock().await.stats.snapshot();
            sink.on_complete(&snapshot);
            return;
        }

        tokio::time::sleep(poll_interval).await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex as StdMutex;

    use super::*;
    use crate::snapshot::ExamSnapshot;
    use crate::statistics::StudentStatus;
    use crate::traits::NoopSink;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(f, l)| (f.to_string(), l.to_string()))
            .collect()
    }

    fn questions(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("вопрос номер {i} про потоки")).collect()
    }

    fn small_roster() -> Roster {
        Roster {
            examiners: pairs(&[("Игорь", "Петров"), ("Анна", "Иванова")]),
            students: pairs(&[
                ("Мария", "Смирнова"),
                ("Олег", "Кузнецов"),
                ("Нина", "Попова"),
                ("Павел", "Сидоров"),
                ("Вера", "Орлова"),
            ]),
            questions: questions(5),
        }
    }

    fn engine(seed: u64) -> ExamEngine {
        ExamEngine::new(ExamEngineConfig {
            seed: Some(seed),
            ..Default::default()
        })
    }

    struct CollectingSink(StdMutex<Vec<ExamSnapshot>>);

    impl CollectingSink {
        fn new() -> Self {
            Self(StdMutex::new(Vec::new()))
        }

        fn snapshots(&self) -> Vec<ExamSnapshot> {
            self.0.lock().unwrap().clone()
        }
    }

    impl SnapshotSink for CollectingSink {
        fn on_snapshot(&self, snapshot: &ExamSnapshot) {
            self.0.lock().unwrap().push(snapshot.clone());
        }

        fn on_complete(&self, snapshot: &ExamSnapshot) {
            self.0.lock().unwrap().push(snapshot.clone());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn exam_drains_the_queue_and_decides_every_student() {
        let report = engine(7).run(small_roster(), &NoopSink).await.unwrap();

        assert_eq!(report.students_in_queue, 0);
        assert_eq!(report.students.len(), 5);
        assert!(report
            .students
            .iter()
            .all(|s| s.status != StudentStatus::Queued));

        let total: u32 = report.examiners.iter().map(|e| e.total_students).sum();
        assert_eq!(total, 5);
        assert!(report.exam_time > 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn seeded_runs_reproduce() {
        let first = engine(42).run(small_roster(), &NoopSink).await.unwrap();
        let second = engine(42).run(small_roster(), &NoopSink).await.unwrap();

        assert_eq!(first.students, second.students);
        assert_eq!(first.examiners, second.examiners);
        assert_eq!(first.succeeded, second.succeeded);
    }

    #[tokio::test]
    async fn two_question_bank_fails_before_any_session() {
        let mut roster = small_roster();
        roster.questions = questions(2);

        let err = engine(1).run(roster, &NoopSink).await.unwrap_err();
        assert!(matches!(err, ExamError::NotEnoughQuestions(2)));
    }

    #[tokio::test]
    async fn invalid_roster_entry_aborts_setup() {
        let mut roster = small_roster();
        roster.students.push(("R2D2".into(), "Droid".into()));

        let err = engine(1).run(roster, &NoopSink).await.unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test(start_paused = true)]
    async fn empty_student_queue_is_a_valid_run() {
        let mut roster = small_roster();
        roster.students.clear();

        let sink = CollectingSink::new();
        let report = engine(3).run(roster, &sink).await.unwrap();

        assert_eq!(report.students_in_queue, 0);
        assert!(report.students.is_empty());
        let total: u32 = report.examiners.iter().map(|e| e.total_students).sum();
        assert_eq!(total, 0);
        assert!(sink.snapshots().last().unwrap().finished);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_examiner_roster_reports_and_returns() {
        let mut roster = small_roster();
        roster.examiners.clear();

        let sink = CollectingSink::new();
        let report = engine(3).run(roster, &sink).await.unwrap();

        assert_eq!(report.students_in_queue, 5);
        assert_eq!(sink.snapshots().len(), 1);
    }

    // A twelve-letter first name means sessions of at least eleven seconds,
    // so the threshold is crossed after three students with three still
    // queued, and the reporting loop must catch the lunch flag.
    #[tokio::test(start_paused = true)]
    async fn lunch_break_is_observed_by_the_reporting_loop() {
        let roster = Roster {
            examiners: pairs(&[("Александрина", "Волкова")]),
            students: pairs(&[
                ("Мария", "Смирнова"),
                ("Олег", "Кузнецов"),
                ("Нина", "Попова"),
                ("Павел", "Сидоров"),
                ("Вера", "Орлова"),
                ("Иван", "Козлов"),
            ]),
            questions: questions(5),
        };

        let sink = CollectingSink::new();
        let report = engine(9).run(roster, &sink).await.unwrap();

        let snapshots = sink.snapshots();
        let lunches: Vec<&ExamSnapshot> = snapshots
            .iter()
            .filter(|s| s.examiners[0].on_lunch_break)
            .collect();
        assert!(!lunches.is_empty(), "no snapshot observed the lunch break");
        assert!(lunches
            .iter()
            .all(|s| s.examiners[0].current_student.is_none()));

        assert_eq!(report.students_in_queue, 0);
        assert_eq!(report.examiners[0].total_students, 6);
    }
}
