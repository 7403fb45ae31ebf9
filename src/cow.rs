// Decorative terminal cow. Carries no engineering weight whatsoever, but a
// long resampling run deserves some company.

use std::fmt;

use crate::util::{CBLUE, ENDC};

const ANONYMOUS: &str = "Anonymous because you didn't give me a name!";

/// A cow that lives in your terminal and comments on your analyses.
#[derive(Debug, Clone, PartialEq)]
pub struct Cow {
    name: String,
}

impl Cow {
    /// Summon a cow, named or anonymous. The cow introduces itself on
    /// arrival, in blue.
    pub fn new(name: Option<&str>) -> Cow {
        let cow = Cow {
            name: String::from(name.unwrap_or(ANONYMOUS)),
        };
        println!("{}{}{}", CBLUE, cow.intro_art(), ENDC);
        cow
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The arrival banner.
    pub fn intro_art(&self) -> String {
        format!(
            r"\|/         (__)
     `\------(oo)      Mooh, I'm {}
       ||    (__)
       ||w--||     \|/
   \|/",
            self.name
        )
    }

    pub fn say_name(&self) {
        println!("Moo, I'm a cow called {}!", self.name);
    }

    pub fn moo(&self) {
        println!("{}", moo_text(1));
    }

    /// A moo with `n` o's in it.
    pub fn moo_stretched(&self, n: usize) {
        println!("{}", moo_text(n));
    }

    /// A series of `n` moos of increasing length.
    pub fn moo_scale(&self, n: usize) {
        for i in 0..n {
            println!("{}", moo_text(i));
        }
    }

    pub fn sit(&self) {
        println!("{}{}{}", CBLUE, SITTING, ENDC);
    }

    pub fn donkey(&self) {
        println!("{}{}{}", CBLUE, DONKEY, ENDC);
    }

    pub fn milk(&self) {
        println!("{}{}{}", CBLUE, MILK, ENDC);
    }
}

impl fmt::Display for Cow {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "a cow called {}", self.name)
    }
}

/// "Mooh!" with a configurable number of o's.
pub fn moo_text(n: usize) -> String {
    format!("Mo{}h!", "o".repeat(n))
}

const SITTING: &str = r#"            /( ,,,,, )\
           _\,;;;;;;;,/_
        .-"; ;;;;;;;;; ;"-.
        '.__/`_ / \ _`\__.'
           | (')| |(') |
           | .--' '--. |
           |/ o     o \|
           |           |
          / \ _..=.._ / \
         /:. '._____.'   \
        ;::'    / \      .;
        |     _|_ _|_   ::|
      .-|     '==o=='    '|-.
     /  |  . /       \    |  |
     |  | ::|         |   | .|
     |  (  ')         (.  )::|
     |: |   |; U U U ;|:: | `|
     |' |   | \ U U / |'  |  |
     ##V|   |_/`"""`\_|   |V##
       ##V##         ##V##"#;

const DONKEY: &str = r#"                        ,     ,
                    ___('-&&&-')__
                   '.__./     \__.'
       _     _     _ .-'  6  6 \
    /` `--'( ('--` `\         |
    /        ) )      \ \ _   _|
   |        ( (        | (0_._0)
   |         ) )       |/ '---'
   |        ( (        |\_
   |         ) )       |( \,
    \       ((`       / )__/
     |     /:))\     |   d
     |    /:((::\    |
     |   |:::):::|   |
     /   \::&&:::/   \
     \   /;U&::U;\   /
      | | | u:u | | |
      | | \     / | |
      | | _|   | _| |
      / |""`   `""/ \
     | __|       | __|
     `""""`      `""""`"#;

const MILK: &str = r#"-=Milk Map Milk=-
           _____
          j_____j
         /_____/_\
         |_(~)_| |
         | )"( | |
         |(@_@)| |
         |_____|,''"#;
