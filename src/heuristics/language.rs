//! Ecosystem detection from image names and install commands.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    NodeJs,
    Ruby,
    Python,
    Java,
    Php,
    Go,
    Generic,
}

/// Image-name fragments per ecosystem, checked in order.
static IMAGE_MARKERS: &[(&[&str], Language)] = &[
    (&["node"], Language::NodeJs),
    (&["ruby", "rails"], Language::Ruby),
    (&["python", "django"], Language::Python),
    (&["openjdk", "java", "maven", "gradle", "jdk"], Language::Java),
    (&["php", "laravel"], Language::Php),
    (&["golang", "cimg/go", "circleci/go"], Language::Go),
];

impl Language {
    /// Guess the ecosystem from a container image name.
    pub fn from_image(image: Option<&str>) -> Self {
        let Some(image) = image else {
            return Self::Generic;
        };
        let image = image.to_ascii_lowercase();
        IMAGE_MARKERS
            .iter()
            .find(|(markers, _)| markers.iter().any(|m| image.contains(m)))
            .map(|(_, language)| *language)
            .unwrap_or(Self::Generic)
    }

    /// File whose checksum should key the dependency cache.
    pub fn lockfile(&self) -> &'static str {
        match self {
            Self::NodeJs => "package-lock.json",
            Self::Ruby => "Gemfile.lock",
            Self::Python => "requirements.txt",
            Self::Java => "pom.xml",
            Self::Php => "composer.lock",
            Self::Go => "go.sum",
            Self::Generic => "<lockfile>",
        }
    }

    /// Directory holding installed dependencies.
    pub fn dependency_path(&self) -> &'static str {
        match self {
            Self::NodeJs => "node_modules",
            Self::Ruby => "vendor/bundle",
            Self::Python => "~/.cache/pip",
            Self::Java => "~/.m2",
            Self::Php => "vendor",
            Self::Go => "~/go/pkg/mod",
            Self::Generic => "<dependency-directory>",
        }
    }

    pub fn install_command(&self) -> &'static str {
        match self {
            Self::NodeJs => "npm ci",
            Self::Ruby => "bundle config set path vendor/bundle && bundle install",
            Self::Python => "pip install -r requirements.txt",
            Self::Java => "mvn dependency:go-offline",
            Self::Php => "composer install --no-interaction",
            Self::Go => "go mod download",
            Self::Generic => "<install dependencies>",
        }
    }

    pub fn cache_prefix(&self) -> &'static str {
        match self {
            Self::NodeJs => "v1-npm-deps",
            Self::Ruby => "v1-gem-deps",
            Self::Python => "v1-pip-deps",
            Self::Java => "v1-maven-deps",
            Self::Php => "v1-composer-deps",
            Self::Go => "v1-go-mod",
            Self::Generic => "v1-deps",
        }
    }
}
