// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Tasks of the `enviar_notificaciones` workflow:
//! `detect_critical >> [realtime_alert, prepare_emails, sms_alert] >> record_notifications`.

pub mod detect_critical;
pub mod prepare_emails;
pub mod realtime;
pub mod record;
pub mod sms;

pub use detect_critical::DetectCriticalTask;
pub use prepare_emails::PrepareEmailsTask;
pub use realtime::RealtimeAlertTask;
pub use record::RecordNotificationsTask;
pub use sms::SmsAlertTask;
