fn main() {
    // ESP-IDF linkage is only relevant when the espidf feature is enabled;
    // host test builds skip it entirely.
    if std::env::var_os("CARGO_FEATURE_ESPIDF").is_some() {
        embuild::espidf::sysenv::output();
    }
}
