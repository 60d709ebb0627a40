//! Built-in sample programs used to pre-populate the editor.
//!
//! Every supported language gets the same small Fibonacci program so the
//! difference between styles is easy to compare across languages.

use serde::Serialize;

use crate::types::ProgrammingLanguage;

const JAVASCRIPT: &str = r#"// A simple function to calculate Fibonacci numbers
function fibonacci(n) {
  if (n <= 1) return n;
  return fibonacci(n - 1) + fibonacci(n - 2);
}

// Calculate first 10 Fibonacci numbers
const results = Array.from({ length: 10 }, (_, i) => fibonacci(i));
console.log("First 10 Fibonacci numbers:", results);"#;

const PYTHON: &str = r#"# A simple function to calculate Fibonacci numbers
def fibonacci(n):
    if n <= 1:
        return n
    return fibonacci(n - 1) + fibonacci(n - 2)

# Calculate first 10 Fibonacci numbers
results = [fibonacci(i) for i in range(10)]
print("First 10 Fibonacci numbers:", results)"#;

const TYPESCRIPT: &str = r#"// A simple function to calculate Fibonacci numbers
function fibonacci(n: number): number {
  if (n <= 1) return n;
  return fibonacci(n - 1) + fibonacci(n - 2);
}

// Calculate first 10 Fibonacci numbers
const results: number[] = Array.from(
  { length: 10 },
  (_, i) => fibonacci(i)
);
console.log("First 10 Fibonacci numbers:", results);"#;

const JAVA: &str = r#"public class Fibonacci {
    public static int fibonacci(int n) {
        if (n <= 1) return n;
        return fibonacci(n - 1) + fibonacci(n - 2);
    }

    public static void main(String[] args) {
        System.out.println("First 10 Fibonacci numbers:");
        for (int i = 0; i < 10; i++) {
            System.out.print(fibonacci(i) + " ");
        }
    }
}"#;

const CPP: &str = r#"#include <iostream>
#include <vector>

int fibonacci(int n) {
    if (n <= 1) return n;
    return fibonacci(n - 1) + fibonacci(n - 2);
}

int main() {
    std::cout << "First 10 Fibonacci numbers:\n";
    for (int i = 0; i < 10; i++) {
        std::cout << fibonacci(i) << " ";
    }
    return 0;
}"#;

const RUBY: &str = r##"# A simple function to calculate Fibonacci numbers
def fibonacci(n)
  return n if n <= 1
  fibonacci(n - 1) + fibonacci(n - 2)
end

# Calculate first 10 Fibonacci numbers
results = (0..9).map { |i| fibonacci(i) }
puts "First 10 Fibonacci numbers: #{results.join(', ')}""##;

const GO: &str = r#"package main

import "fmt"

func fibonacci(n int) int {
    if n <= 1 {
        return n
    }
    return fibonacci(n-1) + fibonacci(n-2)
}

func main() {
    fmt.Println("First 10 Fibonacci numbers:")
    for i := 0; i < 10; i++ {
        fmt.Printf("%d ", fibonacci(i))
    }
}"#;

/// One entry of the [`ExampleLibrary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeExample {
    pub language: ProgrammingLanguage,
    pub editor_language: &'static str,
    pub code: &'static str,
}

/// Read-only `language -> sample` table.
///
/// Built once at start-up and shared by reference afterwards.
#[derive(Debug, Clone)]
pub struct ExampleLibrary {
    examples: Vec<CodeExample>,
}

impl ExampleLibrary {
    pub fn builtin() -> Self {
        let examples = ProgrammingLanguage::ALL
            .iter()
            .map(|&language| CodeExample {
                language,
                editor_language: language.editor_id(),
                code: builtin_source(language),
            })
            .collect();

        Self { examples }
    }

    /// Sample source for `language`, or an empty string when the table has
    /// no entry for it.
    pub fn get(&self, language: ProgrammingLanguage) -> &'static str {
        self.examples
            .iter()
            .find(|example| example.language == language)
            .map(|example| example.code)
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CodeExample> {
        self.examples.iter()
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }
}

impl Default for ExampleLibrary {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_source(language: ProgrammingLanguage) -> &'static str {
    match language {
        ProgrammingLanguage::JavaScript => JAVASCRIPT,
        ProgrammingLanguage::Python => PYTHON,
        ProgrammingLanguage::TypeScript => TYPESCRIPT,
        ProgrammingLanguage::Java => JAVA,
        ProgrammingLanguage::Cpp => CPP,
        ProgrammingLanguage::Ruby => RUBY,
        ProgrammingLanguage::Go => GO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_language_has_a_sample() {
        let library = ExampleLibrary::builtin();
        assert_eq!(library.len(), ProgrammingLanguage::ALL.len());

        for language in ProgrammingLanguage::ALL {
            let code = library.get(language);
            assert!(!code.is_empty(), "{language} has no sample");
            assert!(code.contains("fibonacci"), "{language} sample changed");
        }
    }

    #[test]
    fn test_samples_keep_language_specific_syntax() {
        let library = ExampleLibrary::builtin();

        assert!(library.get(ProgrammingLanguage::Python).starts_with("# A simple"));
        assert!(library
            .get(ProgrammingLanguage::Cpp)
            .contains(r#"std::cout << "First 10 Fibonacci numbers:\n";"#));
        assert!(library
            .get(ProgrammingLanguage::Ruby)
            .ends_with(r#"#{results.join(', ')}""#));
        assert!(library.get(ProgrammingLanguage::Go).starts_with("package main"));
    }

    #[test]
    fn test_example_serializes_editor_language() {
        let library = ExampleLibrary::builtin();
        let cpp = library
            .iter()
            .find(|example| example.language == ProgrammingLanguage::Cpp)
            .unwrap();

        let value = serde_json::to_value(cpp).unwrap();
        assert_eq!(value["language"], "C++");
        assert_eq!(value["editorLanguage"], "cpp");
    }
}
