// Parser unit tests

mod test_conditions;
mod test_control_flow;
