use super::PlannedUpdate;
use crate::error::{Result, VersionsError};
use regex::{Captures, Regex};

/// Rewrites `"group:name:version"` string notations in a Groovy or Kotlin
/// build script. Only the declared version is replaced, so notations that
/// interpolate a variable are left alone.
///
/// Returns the new script and the updates that matched at least once.
pub fn update_build_script<'a>(
    content: &str,
    updates: &'a [PlannedUpdate],
) -> Result<(String, Vec<&'a PlannedUpdate>)> {
    let mut script = content.to_string();
    let mut applied = Vec::new();

    for update in updates {
        let pattern = format!(
            r#"(["']){}:{}:{}(["':@])"#,
            regex::escape(&update.group),
            regex::escape(&update.name),
            regex::escape(&update.from)
        );
        let regex = Regex::new(&pattern)
            .map_err(|e| VersionsError::InvalidInput(format!("{}: {e}", update.module())))?;
        if !regex.is_match(&script) {
            continue;
        }

        let module = update.module();
        script = regex
            .replace_all(&script, |caps: &Captures| {
                format!("{}{}:{}{}", &caps[1], module, update.to, &caps[2])
            })
            .into_owned();
        applied.push(update);
    }

    Ok((script, applied))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_kotlin_and_groovy_notations() {
        let script = r#"dependencies {
    implementation("com.squareup.okhttp3:okhttp:4.11.0")
    testImplementation 'junit:junit:4.12'
    runtimeOnly("com.squareup.okhttp3:okhttp:4.11.0:sources@jar")
}
"#;
        let updates = [
            PlannedUpdate::new("com.squareup.okhttp3", "okhttp", "4.11.0", "4.12.0"),
            PlannedUpdate::new("junit", "junit", "4.12", "4.13.2"),
        ];

        let (updated, applied) = update_build_script(script, &updates).unwrap();
        assert_eq!(
            updated,
            r#"dependencies {
    implementation("com.squareup.okhttp3:okhttp:4.12.0")
    testImplementation 'junit:junit:4.13.2'
    runtimeOnly("com.squareup.okhttp3:okhttp:4.12.0:sources@jar")
}
"#
        );
        assert_eq!(applied.len(), 2);
    }

    #[test]
    fn leaves_other_versions_and_variables_alone() {
        let script = r#"implementation("g:a:$aVersion")
implementation("g:a:1.0.1")
implementation("g:ab:1.0")
"#;
        let updates = [PlannedUpdate::new("g", "a", "1.0", "2.0")];

        let (updated, applied) = update_build_script(script, &updates).unwrap();
        assert_eq!(updated, script);
        assert!(applied.is_empty());
    }

    #[test]
    fn escapes_regex_characters_in_coordinates() {
        let script = r#"implementation("org.example:lib:1.0+build")"#;
        let updates = [PlannedUpdate::new("org.example", "lib", "1.0+build", "1.1")];
        let (updated, _) = update_build_script(script, &updates).unwrap();
        assert_eq!(updated, r#"implementation("org.example:lib:1.1")"#);

        let (unchanged, applied) =
            update_build_script(r#"implementation("orgXexample:lib:1.0+build")"#, &updates)
                .unwrap();
        assert_eq!(unchanged, r#"implementation("orgXexample:lib:1.0+build")"#);
        assert!(applied.is_empty());
    }
}
