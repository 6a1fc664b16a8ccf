pub mod parlays;
