use std::sync::Arc;

use chrono::{DateTime, Days, Local, NaiveTime, TimeZone};
use serde::Serialize;
use tokio::process::Command;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::prefs::{
    PrefsError, PrefsStore, ReminderPrefs, DEFAULT_REMINDER_HOUR, DEFAULT_REMINDER_MINUTE,
};

pub const REMINDER_TITLE: &str = "Daily Inspiration";
pub const REMINDER_BODY: &str = "Time for your daily quote reflection.";

#[derive(Debug, thiserror::Error)]
pub enum ReminderError {
    #[error("invalid reminder time {hour:02}:{minute:02}")]
    InvalidTime { hour: u32, minute: u32 },
    #[error(transparent)]
    Prefs(#[from] PrefsError),
}

/// Delivers local notifications.
pub trait Notifier: Send + Sync {
    /// Whether the host allows this process to post notifications.
    fn is_permitted(&self) -> bool {
        true
    }

    fn notify(&self, title: &str, body: &str);
}

pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, title: &str, body: &str) {
        tracing::info!(title, body, "reminder");
    }
}

/// Runs an external program with the title and body appended as its last
/// two arguments, e.g. `notify-send`.
pub struct CommandNotifier {
    program: String,
    args: Vec<String>,
}

impl CommandNotifier {
    pub fn from_command_line(command: &str) -> Option<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }
}

impl Notifier for CommandNotifier {
    fn notify(&self, title: &str, body: &str) {
        let spawned = Command::new(&self.program)
            .args(&self.args)
            .arg(title)
            .arg(body)
            .spawn();
        if let Err(e) = spawned {
            tracing::warn!(program = %self.program, "failed to run notify command: {e}");
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReminderStatus {
    pub enabled: bool,
    pub hour: u32,
    pub minute: u32,
    pub armed: bool,
    pub next_fire_at: Option<DateTime<Local>>,
}

/// Arms a daily local reminder and keeps its schedule in the prefs file so
/// it can be restored on the next start.
///
/// The `task` lock is held across every prefs write and the matching arm or
/// abort, so the saved schedule and the running task never disagree.
pub struct ReminderScheduler {
    notifier: Arc<dyn Notifier>,
    prefs: PrefsStore,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl ReminderScheduler {
    pub fn new(notifier: Arc<dyn Notifier>, prefs: PrefsStore) -> Self {
        Self {
            notifier,
            prefs,
            task: Mutex::new(None),
        }
    }

    /// Schedule the reminder for `hour:minute` every day, replacing any
    /// earlier schedule.
    ///
    /// Returns `Ok(false)` without touching the prefs when the notifier is
    /// not permitted to post.
    pub async fn schedule_daily_reminder(
        &self,
        hour: u32,
        minute: u32,
    ) -> Result<bool, ReminderError> {
        if NaiveTime::from_hms_opt(hour, minute, 0).is_none() {
            return Err(ReminderError::InvalidTime { hour, minute });
        }

        if !self.notifier.is_permitted() {
            tracing::warn!(hour, minute, "notifications not permitted; reminder not scheduled");
            return Ok(false);
        }

        let mut task = self.task.lock().await;
        self.prefs
            .save(&ReminderPrefs {
                reminder_enabled: true,
                reminder_hour: hour,
                reminder_minute: minute,
            })
            .await?;

        self.arm(&mut task, hour, minute);
        Ok(true)
    }

    pub async fn cancel_all_reminders(&self) -> Result<(), ReminderError> {
        let mut task = self.task.lock().await;

        let mut prefs = self.prefs.load().await?.unwrap_or_default();
        prefs.reminder_enabled = false;
        self.prefs.save(&prefs).await?;

        if let Some(task) = task.take() {
            task.abort();
        }

        tracing::info!("daily reminder cancelled");
        Ok(())
    }

    /// Re-arm from the prefs file after a restart. With no saved schedule
    /// the default 09:00 reminder is set up.
    pub async fn restore(&self) -> Result<(), ReminderError> {
        match self.prefs.load().await? {
            Some(prefs) if prefs.reminder_enabled => {
                self.schedule_daily_reminder(prefs.reminder_hour, prefs.reminder_minute)
                    .await?;
            }
            Some(_) => tracing::debug!("daily reminder disabled"),
            None => {
                self.schedule_daily_reminder(DEFAULT_REMINDER_HOUR, DEFAULT_REMINDER_MINUTE)
                    .await?;
            }
        }
        Ok(())
    }

    pub async fn status(&self) -> Result<ReminderStatus, ReminderError> {
        let task = self.task.lock().await;
        let prefs = self.prefs.load().await?.unwrap_or_default();
        let armed = task.as_ref().is_some_and(|task| !task.is_finished());

        let next_fire_at = if prefs.reminder_enabled && armed {
            next_fire_after(&Local::now(), prefs.reminder_hour, prefs.reminder_minute)
        } else {
            None
        };

        Ok(ReminderStatus {
            enabled: prefs.reminder_enabled,
            hour: prefs.reminder_hour,
            minute: prefs.reminder_minute,
            armed,
            next_fire_at,
        })
    }

    /// Spawn the daily loop into `slot`, aborting whatever ran there before.
    fn arm(&self, slot: &mut Option<JoinHandle<()>>, hour: u32, minute: u32) {
        let notifier = Arc::clone(&self.notifier);
        let handle = tokio::spawn(async move {
            let mut after = Local::now();
            loop {
                let Some(next) = next_fire_after(&after, hour, minute) else {
                    tracing::warn!(hour, minute, "no upcoming reminder time");
                    return;
                };
                tracing::info!(%next, "daily reminder armed");

                let wait = (next - Local::now()).to_std().unwrap_or_default();
                tokio::time::sleep(wait).await;
                notifier.notify(REMINDER_TITLE, REMINDER_BODY);

                if !notifier.is_permitted() {
                    tracing::warn!("notifications no longer permitted; reminder not re-armed");
                    return;
                }
                after = Local::now().max(next);
            }
        });

        if let Some(previous) = slot.replace(handle) {
            previous.abort();
        }
    }
}

impl Drop for ReminderScheduler {
    fn drop(&mut self) {
        if let Some(task) = self.task.get_mut().take() {
            task.abort();
        }
    }
}

/// The first `hour:minute:00` strictly after `now`, in `now`'s time zone.
/// Local times skipped by a DST change roll over to the following day.
pub fn next_fire_after<Tz: TimeZone>(
    now: &DateTime<Tz>,
    hour: u32,
    minute: u32,
) -> Option<DateTime<Tz>> {
    let time = NaiveTime::from_hms_opt(hour, minute, 0)?;
    let today = now.date_naive();

    (0..=2)
        .filter_map(|offset| today.checked_add_days(Days::new(offset)))
        .filter_map(|day| now.timezone().from_local_datetime(&day.and_time(time)).earliest())
        .find(|candidate| candidate > now)
}
