use chrono::{SubsecRound, Utc};
use log::{debug, error, warn};
use strum::IntoEnumIterator;

use crate::{
    Backup, Catalog, Exercise, ExerciseError, ExerciseRepository, ExerciseUpdate, FieldValues,
    ImportError, ImportPreview, ImportState, Ledger, Metric, MetricChange, MetricSet, Name,
    ReadError, StorageError, Summary, WeightUnit, Workout, WorkoutError, WorkoutID,
    WorkoutRecord, WorkoutRepository, WorkoutValues, catalog, statistics,
};

/// Owner of all exercises and workouts.
///
/// Every successful modification is written to the repository before the
/// operation returns.
pub struct Service<R> {
    repository: R,
    catalog: Catalog,
    ledger: Ledger,
    import: ImportState,
}

macro_rules! log_on_error {
    ($func: expr, $error: ident, $action: literal, $entity: literal) => {{
        let result = $func;
        match result {
            Ok(_) => {}
            Err(ref err) => match err {
                $error::Storage(_) => {
                    error!("failed to {} {}: {err}", $action, $entity);
                }
                _ => {
                    debug!("failed to {} {}: {err}", $action, $entity);
                }
            },
        }
        result
    }};
}

impl<R> Service<R>
where
    R: ExerciseRepository + WorkoutRepository,
{
    pub fn new(repository: R) -> Result<Self, ReadError> {
        let raw = repository.read_exercises()?;
        let records = repository.read_workouts()?;
        let migrate = raw.as_deref().is_some_and(catalog::needs_migration);

        let mut catalog = raw.map_or_else(Catalog::with_defaults, |raw| Catalog::from_raw(&raw));
        let mut ledger = Ledger::from_records(records);
        let completed = reconcile(&mut catalog, &mut ledger);

        let service = Self {
            repository,
            catalog,
            ledger,
            import: ImportState::Idle,
        };

        if migrate || completed {
            debug!("storing migrated or completed exercises");
            if let Err(err) = service
                .repository
                .write_exercises(service.catalog.exercises())
            {
                error!("failed to store exercises: {err}");
            }
        }

        Ok(service)
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    #[must_use]
    pub fn exercises(&self) -> &[Exercise] {
        self.catalog.exercises()
    }

    #[must_use]
    pub fn metrics(&self, exercise: &Name) -> MetricSet {
        self.catalog.metrics(exercise)
    }

    pub fn add_exercise(
        &mut self,
        name: &str,
        metrics: &[Metric],
    ) -> Result<Exercise, ExerciseError> {
        log_on_error!(
            self.try_add_exercise(name, metrics),
            ExerciseError,
            "add",
            "exercise"
        )
    }

    /// Rename an exercise or change its metrics.
    ///
    /// Adding metrics to an exercise with recorded workouts is not applied
    /// directly. Instead, the change is returned to be resolved by
    /// [`Service::apply_metric_change`] or [`Service::create_variant`].
    pub fn update_exercise(
        &mut self,
        exercise: &Name,
        new_name: &str,
        metrics: &[Metric],
    ) -> Result<ExerciseUpdate, ExerciseError> {
        log_on_error!(
            self.try_update_exercise(exercise, new_name, metrics),
            ExerciseError,
            "update",
            "exercise"
        )
    }

    /// Apply added metrics to future workouts only.
    pub fn apply_metric_change(&mut self, change: MetricChange) -> Result<Exercise, ExerciseError> {
        log_on_error!(
            self.replace_exercise(
                &change.exercise,
                Exercise {
                    name: change.new_name,
                    metrics: change.metrics,
                }
            ),
            ExerciseError,
            "update",
            "exercise"
        )
    }

    /// Create a separate exercise with the changed metrics and no workouts.
    pub fn create_variant(
        &mut self,
        change: &MetricChange,
        name: &str,
    ) -> Result<Exercise, ExerciseError> {
        log_on_error!(
            self.try_add_exercise(name, &change.metrics),
            ExerciseError,
            "create",
            "variant"
        )
    }

    pub fn log_workout(
        &mut self,
        exercise: &Name,
        input: &FieldValues,
    ) -> Result<Workout, WorkoutError> {
        log_on_error!(
            self.try_log_workout(exercise, input),
            WorkoutError,
            "log",
            "workout"
        )
    }

    /// Change the values of a workout and possibly move it to another exercise.
    ///
    /// The values are validated against the metrics of the target exercise.
    /// The date of the workout is kept.
    pub fn edit_workout(
        &mut self,
        id: WorkoutID,
        exercise: &Name,
        input: &FieldValues,
    ) -> Result<Workout, WorkoutError> {
        log_on_error!(
            self.try_edit_workout(id, exercise, input),
            WorkoutError,
            "edit",
            "workout"
        )
    }

    pub fn delete_workout(&mut self, id: WorkoutID) -> Result<Workout, WorkoutError> {
        log_on_error!(
            self.try_delete_workout(id),
            WorkoutError,
            "delete",
            "workout"
        )
    }

    /// ID of the workout at `index` in storage order.
    #[must_use]
    pub fn workout_id(&self, exercise: &Name, index: usize) -> Option<WorkoutID> {
        self.ledger.workout_id(exercise, index)
    }

    #[must_use]
    pub fn workouts(&self, exercise: &Name) -> &[Workout] {
        self.ledger.workouts(exercise)
    }

    #[must_use]
    pub fn history(&self, exercise: &Name) -> Vec<&Workout> {
        self.ledger.history(exercise)
    }

    #[must_use]
    pub fn last_value(&self, exercise: &Name, unit: WeightUnit) -> String {
        statistics::last_value(self.ledger.workouts(exercise), unit)
    }

    #[must_use]
    pub fn summary(&self, exercise: &Name) -> Option<Summary> {
        statistics::summary(
            self.ledger.workouts(exercise),
            &self.catalog.metrics(exercise),
        )
    }

    /// Chart data of the primary metric of an exercise.
    pub fn chart_series(
        &self,
        exercise: &Name,
    ) -> (Metric, impl Iterator<Item = (usize, f32)> + '_) {
        let metric = statistics::primary_metric(&self.catalog.metrics(exercise));
        (
            metric,
            statistics::chart_series(self.ledger.workouts(exercise), metric),
        )
    }

    /// Stage a backup for import.
    ///
    /// Nothing is changed until the import is confirmed. A previously staged
    /// backup is replaced.
    pub fn import_data(&mut self, backup: Backup) -> ImportPreview {
        let preview = backup.preview();
        self.import = ImportState::PendingConfirmation(backup);
        preview
    }

    #[must_use]
    pub fn pending_import(&self) -> Option<ImportPreview> {
        self.import.preview()
    }

    /// Discard a staged backup. Returns `false` if no import was pending.
    pub fn cancel_import(&mut self) -> bool {
        matches!(
            std::mem::take(&mut self.import),
            ImportState::PendingConfirmation(_)
        )
    }

    /// Replace all exercises and workouts by the staged backup.
    pub fn confirm_import(&mut self) -> Result<(), ImportError> {
        log_on_error!(self.try_confirm_import(), ImportError, "import", "data")
    }

    fn try_add_exercise(
        &mut self,
        name: &str,
        metrics: &[Metric],
    ) -> Result<Exercise, ExerciseError> {
        let name = Name::new(name)?;

        if self.catalog.contains(&name) {
            return Err(ExerciseError::DuplicateName(name));
        }

        let exercise = Exercise {
            name,
            metrics: MetricSet::new(metrics.iter().copied())?,
        };

        self.catalog.add(exercise.clone())?;
        self.ledger.ensure_bucket(&exercise.name);
        self.write_all()?;

        Ok(exercise)
    }

    fn try_update_exercise(
        &mut self,
        name: &Name,
        new_name: &str,
        metrics: &[Metric],
    ) -> Result<ExerciseUpdate, ExerciseError> {
        let metrics = MetricSet::new(metrics.iter().copied())?;
        let new_name = Name::new(new_name)?;

        let Some(exercise) = self.catalog.get(name) else {
            return Err(ExerciseError::NotFound(name.clone()));
        };

        if new_name != *name && self.catalog.contains(&new_name) {
            return Err(ExerciseError::DuplicateName(new_name));
        }

        let added = metrics.added_since(&exercise.metrics);

        if !added.is_empty() && !self.ledger.workouts(name).is_empty() {
            return Ok(ExerciseUpdate::MetricsAdded(MetricChange {
                exercise: name.clone(),
                new_name,
                metrics,
                added,
            }));
        }

        self.replace_exercise(
            name,
            Exercise {
                name: new_name,
                metrics,
            },
        )
        .map(ExerciseUpdate::Applied)
    }

    fn replace_exercise(
        &mut self,
        name: &Name,
        exercise: Exercise,
    ) -> Result<Exercise, ExerciseError> {
        self.catalog.replace(name, exercise.clone())?;
        self.ledger.rename(name, &exercise.name);
        self.write_all()?;

        Ok(exercise)
    }

    fn try_log_workout(
        &mut self,
        exercise: &Name,
        input: &FieldValues,
    ) -> Result<Workout, WorkoutError> {
        let Some(entry) = self.catalog.get(exercise) else {
            return Err(WorkoutError::UnknownExercise(exercise.clone()));
        };

        let values = WorkoutValues::parse(&entry.metrics, input)?;
        let workout = self
            .ledger
            .push(WorkoutRecord {
                date: Utc::now().trunc_subsecs(3),
                exercise: exercise.clone(),
                values,
            })
            .clone();

        self.repository.write_workouts(&self.ledger)?;

        Ok(workout)
    }

    fn try_edit_workout(
        &mut self,
        id: WorkoutID,
        exercise: &Name,
        input: &FieldValues,
    ) -> Result<Workout, WorkoutError> {
        let Some(date) = self.ledger.get(id).map(|w| w.date) else {
            return Err(WorkoutError::NotFound(id));
        };
        let Some(target) = self.catalog.get(exercise) else {
            return Err(WorkoutError::UnknownExercise(exercise.clone()));
        };

        let workout = Workout {
            id,
            date,
            exercise: exercise.clone(),
            values: WorkoutValues::parse(&target.metrics, input)?,
        };

        self.ledger.remove(id);
        self.ledger.insert_sorted(workout.clone());
        self.repository.write_workouts(&self.ledger)?;

        Ok(workout)
    }

    fn try_delete_workout(&mut self, id: WorkoutID) -> Result<Workout, WorkoutError> {
        let workout = self.ledger.remove(id).ok_or(WorkoutError::NotFound(id))?;
        self.repository.write_workouts(&self.ledger)?;
        Ok(workout)
    }

    fn try_confirm_import(&mut self) -> Result<(), ImportError> {
        let ImportState::PendingConfirmation(backup) = std::mem::take(&mut self.import) else {
            return Err(ImportError::NothingPending);
        };

        let mut catalog = Catalog::from_raw(&backup.exercises);
        self.ledger.reset(backup.workouts);
        reconcile(&mut catalog, &mut self.ledger);
        self.catalog = catalog;

        self.write_all()?;

        Ok(())
    }

    fn write_all(&self) -> Result<(), StorageError> {
        self.repository.write_exercises(self.catalog.exercises())?;
        self.repository.write_workouts(&self.ledger)
    }
}

/// Ensure that every exercise has a bucket and every bucket has an exercise.
///
/// Exercises missing in the catalog are added with the metrics found in their
/// workouts. Returns whether exercises were added.
fn reconcile(catalog: &mut Catalog, ledger: &mut Ledger) -> bool {
    let missing = ledger
        .exercises()
        .filter(|name| !catalog.contains(name))
        .cloned()
        .collect::<Vec<_>>();

    let added = !missing.is_empty();

    for name in missing {
        let workouts = ledger.workouts(&name);
        let metrics = MetricSet::new(
            Metric::iter().filter(|m| workouts.iter().any(|w| w.values.get(*m).is_some())),
        )
        .unwrap_or_default();
        warn!("adding missing exercise \"{name}\" tracking {metrics}");
        if let Err(err) = catalog.add(Exercise { name, metrics }) {
            warn!("failed to add missing exercise: {err}");
        }
    }

    for exercise in catalog.exercises() {
        ledger.ensure_bucket(&exercise.name);
    }

    added
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

    use chrono::{DateTime, Duration};
    use pretty_assertions::assert_eq;

    use crate::{MetricValue, RawExercise, Reps, Time};

    use super::*;

    #[derive(Default)]
    struct Stored {
        exercises: Option<Vec<RawExercise>>,
        workouts: BTreeMap<Name, Vec<WorkoutRecord>>,
        writes: usize,
        unavailable: bool,
    }

    #[derive(Clone, Default)]
    struct FakeRepository(Rc<RefCell<Stored>>);

    impl ExerciseRepository for FakeRepository {
        fn read_exercises(&self) -> Result<Option<Vec<RawExercise>>, ReadError> {
            Ok(self.0.borrow().exercises.clone())
        }

        fn write_exercises(&self, exercises: &[Exercise]) -> Result<(), StorageError> {
            let mut stored = self.0.borrow_mut();
            if stored.unavailable {
                return Err(StorageError::Unavailable);
            }
            stored.exercises = Some(exercises.iter().map(RawExercise::from).collect());
            stored.writes += 1;
            Ok(())
        }
    }

    impl WorkoutRepository for FakeRepository {
        fn read_workouts(&self) -> Result<BTreeMap<Name, Vec<WorkoutRecord>>, ReadError> {
            Ok(self.0.borrow().workouts.clone())
        }

        fn write_workouts(&self, ledger: &Ledger) -> Result<(), StorageError> {
            let mut stored = self.0.borrow_mut();
            if stored.unavailable {
                return Err(StorageError::Unavailable);
            }
            stored.workouts = ledger.records();
            stored.writes += 1;
            Ok(())
        }
    }

    fn name(name: &str) -> Name {
        Name::new(name).unwrap()
    }

    fn input(values: &[(Metric, &str)]) -> FieldValues {
        values
            .iter()
            .map(|(metric, value)| (*metric, (*value).to_string()))
            .collect()
    }

    fn record(exercise: &str, days: i64, values: WorkoutValues) -> WorkoutRecord {
        WorkoutRecord {
            date: DateTime::from_timestamp(1_700_000_000, 0).unwrap() + Duration::days(days),
            exercise: name(exercise),
            values,
        }
    }

    fn reps(value: f32) -> WorkoutValues {
        WorkoutValues {
            reps: Some(Reps(value)),
            ..WorkoutValues::default()
        }
    }

    fn service() -> (Service<FakeRepository>, FakeRepository) {
        let repository = FakeRepository::default();
        (Service::new(repository.clone()).unwrap(), repository)
    }

    fn service_with(
        exercises: Vec<RawExercise>,
        workouts: BTreeMap<Name, Vec<WorkoutRecord>>,
    ) -> (Service<FakeRepository>, FakeRepository) {
        let repository = FakeRepository::default();
        {
            let mut stored = repository.0.borrow_mut();
            stored.exercises = Some(exercises);
            stored.workouts = workouts;
        }
        (Service::new(repository.clone()).unwrap(), repository)
    }

    fn current(name: &str, metrics: &[Metric]) -> RawExercise {
        RawExercise::Current {
            name: name.to_string(),
            metrics: metrics.to_vec(),
        }
    }

    #[test]
    fn test_new_without_stored_data() {
        let (service, repository) = service();
        assert_eq!(
            service.exercises(),
            Catalog::with_defaults().exercises()
        );
        assert!(service.ledger().contains(&name("chin-ups")));
        assert_eq!(repository.0.borrow().writes, 0);
    }

    #[test]
    fn test_new_migrates_legacy_exercises() {
        let (service, repository) = service_with(
            vec![
                RawExercise::Legacy("pushups".to_string()),
                current("plank", &[Metric::Time]),
            ],
            BTreeMap::new(),
        );
        assert_eq!(service.metrics(&name("pushups")), MetricSet::default());
        assert_eq!(
            repository.0.borrow().exercises,
            Some(vec![
                current("pushups", &[Metric::Reps]),
                current("plank", &[Metric::Time]),
            ])
        );
    }

    #[test]
    fn test_new_adds_missing_exercises() {
        let (service, repository) = service_with(
            vec![current("pushups", &[Metric::Reps])],
            BTreeMap::from([(
                name("farmer walk"),
                vec![record(
                    "farmer walk",
                    0,
                    WorkoutValues {
                        weight: Some(crate::Weight(30.0)),
                        time: Some(Time(60)),
                        ..WorkoutValues::default()
                    },
                )],
            )]),
        );
        assert_eq!(
            service.metrics(&name("farmer walk")),
            MetricSet::new([Metric::Weight, Metric::Time]).unwrap()
        );
        assert_eq!(service.exercises().len(), 2);
        assert_eq!(
            repository.0.borrow().exercises,
            Some(vec![
                current("pushups", &[Metric::Reps]),
                current("farmer walk", &[Metric::Weight, Metric::Time]),
            ])
        );
    }

    #[test]
    fn test_add_exercise() {
        let (mut service, repository) = service();
        let exercise = service
            .add_exercise("Dips", &[Metric::Reps, Metric::Weight])
            .unwrap();
        assert_eq!(exercise.name, name("dips"));
        assert_eq!(service.exercises().last(), Some(&exercise));
        assert_eq!(
            service.metrics(&name("dips")),
            MetricSet::new([Metric::Reps, Metric::Weight]).unwrap()
        );
        assert!(service.workouts(&name("dips")).is_empty());
        assert!(service.ledger().contains(&name("dips")));
        assert_eq!(
            repository.0.borrow().exercises.as_ref().map(Vec::len),
            Some(4)
        );
        assert!(repository.0.borrow().workouts.contains_key(&name("dips")));
    }

    #[test]
    fn test_add_exercise_invalid() {
        let (mut service, repository) = service();
        assert!(matches!(
            service.add_exercise("PUSHUPS", &[Metric::Time]),
            Err(ExerciseError::DuplicateName(_))
        ));
        assert!(matches!(
            service.add_exercise("plank", &[]),
            Err(ExerciseError::EmptyMetricSet(_))
        ));
        assert!(matches!(
            service.add_exercise(" ", &[Metric::Reps]),
            Err(ExerciseError::Name(_))
        ));
        assert_eq!(service.exercises().len(), 3);
        assert_eq!(repository.0.borrow().writes, 0);
    }

    #[test]
    fn test_update_exercise_rename() {
        let (mut service, repository) = service_with(
            vec![current("pushups", &[Metric::Reps])],
            BTreeMap::from([(
                name("pushups"),
                vec![record("pushups", 0, reps(10.0)), record("pushups", 1, reps(12.0))],
            )]),
        );
        let update = service
            .update_exercise(&name("pushups"), "Push-Ups", &[Metric::Reps])
            .unwrap();
        assert_eq!(
            update,
            ExerciseUpdate::Applied(Exercise::new("push-ups", &[Metric::Reps]).unwrap())
        );
        assert!(!service.ledger().contains(&name("pushups")));
        assert_eq!(service.workouts(&name("push-ups")).len(), 2);
        assert!(
            service
                .workouts(&name("push-ups"))
                .iter()
                .all(|w| w.exercise == name("push-ups"))
        );
        let stored = repository.0.borrow();
        assert!(!stored.workouts.contains_key(&name("pushups")));
        assert_eq!(
            stored.exercises,
            Some(vec![current("push-ups", &[Metric::Reps])])
        );
    }

    #[test]
    fn test_update_exercise_remove_metric_with_workouts() {
        let (mut service, _) = service_with(
            vec![current("pushups", &[Metric::Reps, Metric::Weight])],
            BTreeMap::from([(name("pushups"), vec![record("pushups", 0, reps(10.0))])]),
        );
        assert!(matches!(
            service.update_exercise(&name("pushups"), "pushups", &[Metric::Reps]),
            Ok(ExerciseUpdate::Applied(_))
        ));
        assert_eq!(service.metrics(&name("pushups")), MetricSet::default());
    }

    #[test]
    fn test_update_exercise_add_metric_without_workouts() {
        let (mut service, _) = service();
        assert!(matches!(
            service.update_exercise(&name("pushups"), "pushups", &[Metric::Reps, Metric::Weight]),
            Ok(ExerciseUpdate::Applied(_))
        ));
        assert_eq!(
            service.metrics(&name("pushups")),
            MetricSet::new([Metric::Reps, Metric::Weight]).unwrap()
        );
    }

    #[test]
    fn test_update_exercise_add_metric_with_workouts() {
        let (mut service, repository) = service_with(
            vec![current("pushups", &[Metric::Reps])],
            BTreeMap::from([(name("pushups"), vec![record("pushups", 0, reps(10.0))])]),
        );
        let writes = repository.0.borrow().writes;
        let update = service
            .update_exercise(&name("pushups"), "pushups", &[Metric::Reps, Metric::Weight])
            .unwrap();
        let ExerciseUpdate::MetricsAdded(change) = update else {
            panic!("unexpected update: {update:?}");
        };
        assert_eq!(change.added, vec![Metric::Weight]);
        assert_eq!(service.metrics(&name("pushups")), MetricSet::default());
        assert_eq!(repository.0.borrow().writes, writes);

        let exercise = service.apply_metric_change(change).unwrap();
        assert_eq!(
            exercise.metrics,
            MetricSet::new([Metric::Reps, Metric::Weight]).unwrap()
        );
        assert_eq!(service.workouts(&name("pushups")).len(), 1);
    }

    #[test]
    fn test_create_variant() {
        let (mut service, _) = service_with(
            vec![current("pushups", &[Metric::Reps])],
            BTreeMap::from([(name("pushups"), vec![record("pushups", 0, reps(10.0))])]),
        );
        let ExerciseUpdate::MetricsAdded(change) = service
            .update_exercise(&name("pushups"), "pushups", &[Metric::Reps, Metric::Weight])
            .unwrap()
        else {
            panic!("metric change expected");
        };
        let variant = service
            .create_variant(&change, "Pushups (Weighted)")
            .unwrap();
        assert_eq!(variant.name, name("pushups (weighted)"));
        assert_eq!(
            service.metrics(&variant.name),
            MetricSet::new([Metric::Reps, Metric::Weight]).unwrap()
        );
        assert!(service.workouts(&variant.name).is_empty());
        assert_eq!(service.metrics(&name("pushups")), MetricSet::default());
        assert_eq!(service.workouts(&name("pushups")).len(), 1);
        assert!(matches!(
            service.create_variant(&change, "pushups"),
            Err(ExerciseError::DuplicateName(_))
        ));
    }

    #[test]
    fn test_update_exercise_invalid() {
        let (mut service, _) = service();
        assert!(matches!(
            service.update_exercise(&name("pushups"), "pushups", &[]),
            Err(ExerciseError::EmptyMetricSet(_))
        ));
        assert!(matches!(
            service.update_exercise(&name("pushups"), "chin-ups", &[Metric::Reps]),
            Err(ExerciseError::DuplicateName(_))
        ));
        assert!(matches!(
            service.update_exercise(&name("lunges"), "lunges", &[Metric::Reps]),
            Err(ExerciseError::NotFound(_))
        ));
    }

    #[test]
    fn test_log_workout() {
        let (mut service, repository) = service();
        let workout = service
            .log_workout(&name("pushups"), &input(&[(Metric::Reps, "20")]))
            .unwrap();
        assert_eq!(workout.values, reps(20.0));
        assert_eq!(workout.exercise, name("pushups"));
        assert!(workout.date <= Utc::now());
        assert_eq!(service.workouts(&name("pushups")), &[workout]);
        assert_eq!(repository.0.borrow().workouts[&name("pushups")].len(), 1);
    }

    #[test]
    fn test_log_workout_average() {
        let (mut service, _) = service();
        for value in ["10", "20", "30"] {
            service
                .log_workout(&name("pushups"), &input(&[(Metric::Reps, value)]))
                .unwrap();
        }
        assert_eq!(
            service.summary(&name("pushups")).and_then(|s| s.average),
            Some(MetricValue::Reps(Reps(20.0)))
        );
        assert_eq!(service.last_value(&name("pushups"), WeightUnit::Lbs), "30 reps");
    }

    #[test]
    fn test_log_workout_time() {
        let (mut service, _) = service();
        service.add_exercise("plank", &[Metric::Time]).unwrap();
        for value in ["2:30", "90"] {
            service
                .log_workout(&name("plank"), &input(&[(Metric::Time, value)]))
                .unwrap();
        }
        assert_eq!(
            service
                .workouts(&name("plank"))
                .iter()
                .map(|w| w.values.label(WeightUnit::Lbs))
                .collect::<Vec<_>>(),
            vec!["2:30", "1:30"]
        );
        let summary = service.summary(&name("plank")).unwrap();
        assert_eq!(summary.metric, Metric::Time);
        assert_eq!(
            summary.average.map(|v| v.to_string()),
            Some("2:00".to_string())
        );
        let (metric, series) = service.chart_series(&name("plank"));
        assert_eq!(metric, Metric::Time);
        assert_eq!(series.collect::<Vec<_>>(), vec![(0, 150.0), (1, 90.0)]);
    }

    #[test]
    fn test_log_workout_invalid() {
        let (mut service, repository) = service();
        assert!(matches!(
            service.log_workout(&name("pushups"), &input(&[(Metric::Reps, "0")])),
            Err(WorkoutError::NoValidMetric)
        ));
        assert!(matches!(
            service.log_workout(&name("lunges"), &input(&[(Metric::Reps, "10")])),
            Err(WorkoutError::UnknownExercise(_))
        ));
        assert!(service.ledger().is_empty());
        assert_eq!(repository.0.borrow().writes, 0);
    }

    #[test]
    fn test_log_workout_storage_unavailable() {
        let (mut service, repository) = service();
        repository.0.borrow_mut().unavailable = true;
        assert!(matches!(
            service.log_workout(&name("pushups"), &input(&[(Metric::Reps, "10")])),
            Err(WorkoutError::Storage(StorageError::Unavailable))
        ));
        assert_eq!(service.workouts(&name("pushups")).len(), 1);
    }

    #[test]
    fn test_edit_workout_move_to_other_exercise() {
        let (mut service, repository) = service_with(
            vec![
                current("pushups", &[Metric::Reps]),
                current("dips", &[Metric::Reps, Metric::Weight]),
            ],
            BTreeMap::from([
                (
                    name("pushups"),
                    vec![record("pushups", 2, reps(10.0)), record("pushups", 4, reps(12.0))],
                ),
                (
                    name("dips"),
                    vec![record("dips", 1, reps(5.0)), record("dips", 3, reps(6.0))],
                ),
            ]),
        );
        let id = service.workout_id(&name("pushups"), 0).unwrap();
        let date = service.ledger().get(id).unwrap().date;
        let total = service.ledger().len();

        let workout = service
            .edit_workout(
                id,
                &name("dips"),
                &input(&[(Metric::Reps, "8"), (Metric::Weight, "10")]),
            )
            .unwrap();

        assert_eq!(workout.id, id);
        assert_eq!(workout.date, date);
        assert_eq!(workout.exercise, name("dips"));
        assert_eq!(service.workouts(&name("pushups")).len(), 1);
        assert_eq!(service.workouts(&name("dips")).len(), 3);
        assert_eq!(service.ledger().len(), total);
        assert_eq!(service.workout_id(&name("dips"), 1), Some(id));
        assert_eq!(
            repository.0.borrow().workouts[&name("dips")][1].values.weight,
            Some(crate::Weight(10.0))
        );
    }

    #[test]
    fn test_edit_workout_validates_against_target_metrics() {
        let (mut service, _) = service_with(
            vec![
                current("pushups", &[Metric::Reps]),
                current("plank", &[Metric::Time]),
            ],
            BTreeMap::from([(name("pushups"), vec![record("pushups", 0, reps(10.0))])]),
        );
        let id = service.workout_id(&name("pushups"), 0).unwrap();
        assert!(matches!(
            service.edit_workout(id, &name("plank"), &input(&[(Metric::Reps, "10")])),
            Err(WorkoutError::NoValidMetric)
        ));
        assert_eq!(service.workouts(&name("pushups")).len(), 1);
        assert!(matches!(
            service.edit_workout(999.into(), &name("pushups"), &input(&[(Metric::Reps, "1")])),
            Err(WorkoutError::NotFound(_))
        ));
        let workout = service
            .edit_workout(id, &name("pushups"), &input(&[(Metric::Reps, "11")]))
            .unwrap();
        assert_eq!(workout.values, reps(11.0));
        assert_eq!(service.workouts(&name("pushups")), &[workout]);
    }

    #[test]
    fn test_delete_workout() {
        let (mut service, repository) = service();
        let workout = service
            .log_workout(&name("pushups"), &input(&[(Metric::Reps, "10")]))
            .unwrap();
        let id = service.workout_id(&name("pushups"), 0).unwrap();
        assert_eq!(service.delete_workout(id).unwrap(), workout);
        assert!(service.history(&name("pushups")).is_empty());
        assert!(repository.0.borrow().workouts[&name("pushups")].is_empty());
        assert!(matches!(
            service.delete_workout(id),
            Err(WorkoutError::NotFound(_))
        ));
    }

    #[test]
    fn test_history() {
        let (service, _) = service_with(
            vec![current("pushups", &[Metric::Reps])],
            BTreeMap::from([(
                name("pushups"),
                vec![
                    record("pushups", 1, reps(1.0)),
                    record("pushups", 3, reps(3.0)),
                    record("pushups", 2, reps(2.0)),
                ],
            )]),
        );
        assert_eq!(
            service
                .history(&name("pushups"))
                .iter()
                .map(|w| w.values.reps)
                .collect::<Vec<_>>(),
            vec![Some(Reps(3.0)), Some(Reps(2.0)), Some(Reps(1.0))]
        );
        assert_eq!(service.last_value(&name("pushups"), WeightUnit::Lbs), "2 reps");
    }

    #[test]
    fn test_import() {
        let (mut service, repository) = service();
        let backup = Backup {
            exercises: vec![RawExercise::Legacy("Squats".to_string())],
            workouts: BTreeMap::from([(
                name("squats"),
                vec![record("squats", 0, reps(5.0))],
            )]),
            export_date: None,
            version: Some("1.0".to_string()),
        };

        let preview = service.import_data(backup);
        assert_eq!(preview.exercises, 1);
        assert_eq!(preview.workouts, 1);
        assert_eq!(service.pending_import(), Some(preview));
        assert_eq!(service.exercises().len(), 3);

        service.confirm_import().unwrap();
        assert_eq!(service.pending_import(), None);
        assert_eq!(
            service.exercises(),
            &[Exercise::new("squats", &[Metric::Reps]).unwrap()]
        );
        assert_eq!(service.workouts(&name("squats")).len(), 1);
        assert!(!service.ledger().contains(&name("pushups")));
        assert_eq!(
            repository.0.borrow().exercises,
            Some(vec![current("squats", &[Metric::Reps])])
        );
        assert!(matches!(
            service.confirm_import(),
            Err(ImportError::NothingPending)
        ));
    }

    #[test]
    fn test_cancel_import() {
        let (mut service, repository) = service();
        assert!(!service.cancel_import());
        service.import_data(Backup {
            exercises: vec![],
            workouts: BTreeMap::new(),
            export_date: None,
            version: None,
        });
        assert!(service.cancel_import());
        assert_eq!(service.pending_import(), None);
        assert_eq!(service.exercises().len(), 3);
        assert_eq!(repository.0.borrow().writes, 0);
    }
}
