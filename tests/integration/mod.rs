mod audit_log;
mod monitor_scenarios;
