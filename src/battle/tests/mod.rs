pub mod common;


#[cfg(test)]
mod test_action_prevention;

#[cfg(test)]
mod test_status_application;







#[cfg(test)]
mod test_field_effects;


#[cfg(test)]
mod test_determinism;
