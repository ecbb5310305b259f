//! PHP support traits that generated code relies on.
//!
//! Generated traits `use` [`BIDIRECTIONAL_TRAIT`] so that paired collections
//! stay in sync. The helpers take and return the collection by value; the
//! generated method assigns the result back to its property.

use std::path::{Path, PathBuf};

use log::info;

use crate::emitter::BIDIRECTIONAL_TRAIT;
use crate::errors::GenerateResult;
use crate::rewriter::write_artifact;

pub const GENERIC_ACCESSORS_TRAIT: &str = "HasGenericAccessors";

const BIDIRECTIONAL_TEMPLATE: &str = r#"<?php

namespace <namespace>;

use Doctrine\Common\Collections\Collection;

/**
 * Keeps both sides of a many-to-many relationship in sync: adding a user to a
 * group also adds the group to the user.
 *
 * Collections must not hold duplicates. Each side only calls the other while
 * the item is missing (or still present, for removals), which is what stops
 * the two sides from calling each other forever. Collections must be
 * initialised, usually in the constructor, before any helper is used.
 */
trait <name>
{
    /**
     * @param object $item Item to add on both sides.
     * @param Collection $collection Local collection, e.g. $this->users.
     * @param string $otherSideAdder Public adder on $item that accepts $this.
     *
     * @return Collection The local collection, to be assigned back to its property.
     */
    protected function addToBothCollections($item, $collection, $otherSideAdder)
    {
        $collection = $this->requireCollection($collection);
        if (!$collection->contains($item)) {
            $collection->add($item);
            $item->{$otherSideAdder}($this);
        }

        return $collection;
    }

    /**
     * @param object $item Item to remove from both sides.
     * @param Collection $collection Local collection, e.g. $this->users.
     * @param string $otherSideRemover Public remover on $item that accepts $this.
     *
     * @return Collection The local collection, to be assigned back to its property.
     */
    protected function removeFromBothCollections($item, $collection, $otherSideRemover)
    {
        $collection = $this->requireCollection($collection);
        if ($collection->contains($item)) {
            $collection->removeElement($item);
            $item->{$otherSideRemover}($this);
        }

        return $collection;
    }

    /**
     * Replaces the contents of the local collection, detaching $this from every
     * current item and attaching it to every new one.
     *
     * @param iterable $items New contents.
     * @param Collection $collection Local collection, e.g. $this->users.
     * @param string $otherSideRemover Public remover on each item that accepts $this.
     * @param string $otherSideAdder Public adder on each item that accepts $this.
     *
     * @return Collection The local collection, to be assigned back to its property.
     */
    protected function setInBothCollections($items, $collection, $otherSideRemover, $otherSideAdder)
    {
        $collection = $this->requireCollection($collection);
        foreach ($collection->toArray() as $current) {
            $collection = $this->removeFromBothCollections($current, $collection, $otherSideRemover);
        }
        foreach ($items as $item) {
            $collection = $this->addToBothCollections($item, $collection, $otherSideAdder);
        }

        return $collection;
    }

    private function requireCollection($collection)
    {
        if (!$collection instanceof Collection) {
            throw new \LogicException(sprintf(
                'Collections on %s must be initialised before they are synchronised.',
                get_class($this)
            ));
        }

        return $collection;
    }
}
"#;

const GENERIC_ACCESSORS_TEMPLATE: &str = r#"<?php

namespace <namespace>;

/**
 * Fallback getters and setters for declared properties. Call genericAccessor()
 * from __call; methods defined on the class always take precedence because
 * __call is only reached for undefined methods.
 */
trait <name>
{
    /**
     * Properties genericAccessor() must never expose.
     *
     * @return string[]
     */
    protected function inaccessibleProperties()
    {
        return [];
    }

    /**
     * Resolves getFoo() and setFoo($value) to the property $foo.
     *
     * @return array Pair of [bool $handled, mixed $result]. Setters return $this.
     */
    protected function genericAccessor($methodName, array $args)
    {
        if (!preg_match('~^(get|set)([A-Z])(.*)$~', $methodName, $matches)) {
            return [false, null];
        }

        $property = strtolower($matches[2]) . $matches[3];
        if (!property_exists($this, $property) || in_array($property, $this->inaccessibleProperties(), true)) {
            return [false, null];
        }

        if ($matches[1] === 'get' && count($args) === 0) {
            return [true, $this->{$property}];
        }
        if ($matches[1] === 'set' && count($args) === 1) {
            $this->{$property} = $args[0];

            return [true, $this];
        }

        return [false, null];
    }
}
"#;

fn render(template: &str, namespace: &str, name: &str) -> String {
    template
        .replace("<namespace>", namespace.trim_matches('\\'))
        .replace("<name>", name)
}

/// Source of the trait that keeps paired collections in sync.
pub fn render_bidirectional_trait(namespace: &str) -> String {
    render(BIDIRECTIONAL_TEMPLATE, namespace, BIDIRECTIONAL_TRAIT)
}

/// Source of the opt-in generic getter/setter trait.
pub fn render_generic_accessors_trait(namespace: &str) -> String {
    render(GENERIC_ACCESSORS_TEMPLATE, namespace, GENERIC_ACCESSORS_TRAIT)
}

/// Writes both runtime traits below `root`, one file per trait in the
/// directory matching `namespace`.
pub fn write_runtime(root: &Path, namespace: &str, extension: &str) -> GenerateResult<Vec<PathBuf>> {
    let mut dir = root.to_path_buf();
    for segment in namespace.split('\\').filter(|segment| !segment.is_empty()) {
        dir.push(segment);
    }

    let traits = [
        (BIDIRECTIONAL_TRAIT, render_bidirectional_trait(namespace)),
        (GENERIC_ACCESSORS_TRAIT, render_generic_accessors_trait(namespace)),
    ];

    let mut written = Vec::with_capacity(traits.len());
    for (name, code) in traits {
        let path = dir.join(format!("{name}{extension}"));
        write_artifact(&path, &code)?;
        written.push(path);
    }

    info!("wrote runtime traits to {}", dir.display());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bidirectional_trait_source() {
        let code = render_bidirectional_trait("\\Acme\\Traits\\");
        assert!(code.starts_with("<?php\n\nnamespace Acme\\Traits;\n"));
        assert!(code.contains("trait HasBidirectionalManyToMany\n{"));
        assert!(code.contains("protected function addToBothCollections($item, $collection, $otherSideAdder)"));
        assert!(code.contains("$collection->removeElement($item);\n            $item->{$otherSideRemover}($this);"));
        assert!(!code.contains("<name>"));
    }

    #[test]
    fn test_generic_accessors_has_exclusion_hook() {
        let code = render_generic_accessors_trait("Acme\\Traits");
        assert!(code.contains("trait HasGenericAccessors"));
        assert!(code.contains("protected function inaccessibleProperties()"));
        assert!(!code.contains("__get"));
    }

    #[test]
    fn test_write_runtime() {
        let dir = tempfile::tempdir().unwrap();
        let written = write_runtime(dir.path(), "Acme\\Traits", ".php").unwrap();

        assert_eq!(written.len(), 2);
        assert_eq!(written[0], dir.path().join("Acme/Traits/HasBidirectionalManyToMany.php"));
        assert!(written.iter().all(|path| path.exists()));
    }
}
