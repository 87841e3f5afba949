pub mod transition_sm;
