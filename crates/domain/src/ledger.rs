use std::collections::BTreeMap;

use crate::{Name, Workout, WorkoutID, WorkoutRecord};

/// Workouts grouped by exercise.
///
/// Workouts of an exercise are kept in storage order. New workouts are
/// appended, edited workouts are inserted by date.
#[derive(Debug, Default, Clone)]
pub struct Ledger {
    buckets: BTreeMap<Name, Vec<Workout>>,
    next_id: u64,
}

impl Ledger {
    /// Build a ledger from stored records.
    ///
    /// The exercise of every record is set to the name of the bucket it is
    /// stored in.
    #[must_use]
    pub fn from_records(records: BTreeMap<Name, Vec<WorkoutRecord>>) -> Self {
        let mut ledger = Self::default();
        ledger.reset(records);
        ledger
    }

    /// Replace all workouts.
    ///
    /// IDs of removed workouts are not reused.
    pub fn reset(&mut self, records: BTreeMap<Name, Vec<WorkoutRecord>>) {
        self.buckets.clear();

        for (name, records) in records {
            self.ensure_bucket(&name);
            for record in records {
                self.push(WorkoutRecord {
                    exercise: name.clone(),
                    ..record
                });
            }
        }
    }

    pub fn buckets(&self) -> impl Iterator<Item = (&Name, &[Workout])> {
        self.buckets.iter().map(|(name, w)| (name, w.as_slice()))
    }

    pub fn exercises(&self) -> impl Iterator<Item = &Name> {
        self.buckets.keys()
    }

    #[must_use]
    pub fn contains(&self, name: &Name) -> bool {
        self.buckets.contains_key(name)
    }

    pub fn ensure_bucket(&mut self, name: &Name) {
        if !self.buckets.contains_key(name) {
            self.buckets.insert(name.clone(), vec![]);
        }
    }

    /// Workouts of an exercise in storage order.
    #[must_use]
    pub fn workouts(&self, name: &Name) -> &[Workout] {
        self.buckets.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// Total number of workouts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn workout_id(&self, name: &Name, index: usize) -> Option<WorkoutID> {
        self.workouts(name).get(index).map(|w| w.id)
    }

    #[must_use]
    pub fn get(&self, id: WorkoutID) -> Option<&Workout> {
        self.buckets.values().flatten().find(|w| w.id == id)
    }

    /// Append a new workout to the bucket of its exercise.
    pub fn push(&mut self, record: WorkoutRecord) -> &Workout {
        let id = WorkoutID::from(self.next_id);
        self.next_id += 1;
        let bucket = self.buckets.entry(record.exercise.clone()).or_default();
        bucket.push(Workout::new(id, record));
        &bucket[bucket.len() - 1]
    }

    /// Insert a workout and sort the bucket of its exercise by date.
    pub fn insert_sorted(&mut self, workout: Workout) {
        let bucket = self.buckets.entry(workout.exercise.clone()).or_default();
        bucket.push(workout);
        bucket.sort_by_key(|w| w.date);
    }

    pub fn remove(&mut self, id: WorkoutID) -> Option<Workout> {
        for bucket in self.buckets.values_mut() {
            if let Some(index) = bucket.iter().position(|w| w.id == id) {
                return Some(bucket.remove(index));
            }
        }
        None
    }

    /// Move all workouts of `old` to `new`.
    pub fn rename(&mut self, old: &Name, new: &Name) {
        if old == new {
            return;
        }
        let mut workouts = self.buckets.remove(old).unwrap_or_default();
        for workout in &mut workouts {
            workout.exercise = new.clone();
        }
        self.buckets.entry(new.clone()).or_default().extend(workouts);
    }

    /// Workouts of an exercise, most recent first.
    ///
    /// Workouts with equal dates keep their storage order.
    #[must_use]
    pub fn history(&self, name: &Name) -> Vec<&Workout> {
        let mut workouts = self.workouts(name).iter().collect::<Vec<_>>();
        workouts.sort_by(|a, b| b.date.cmp(&a.date));
        workouts
    }

    /// Stored records grouped by exercise.
    #[must_use]
    pub fn records(&self) -> BTreeMap<Name, Vec<WorkoutRecord>> {
        self.buckets
            .iter()
            .map(|(name, workouts)| {
                (
                    name.clone(),
                    workouts.iter().map(WorkoutRecord::from).collect(),
                )
            })
            .collect()
    }
}
