/// Tunables of slot offering and event type validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulingPolicy {
    pub slot_granularity_minutes: u32,
    pub booking_window_days: u32,
    pub conflict_buffer_minutes: u32,
    pub duration_step_minutes: u32,
    pub min_duration_minutes: u32,
    pub max_duration_minutes: u32,
}

impl Default for SchedulingPolicy {
    fn default() -> Self {
        Self {
            slot_granularity_minutes: 30,
            booking_window_days: 14,
            conflict_buffer_minutes: 30,
            duration_step_minutes: 15,
            min_duration_minutes: 15,
            max_duration_minutes: 480,
        }
    }
}
