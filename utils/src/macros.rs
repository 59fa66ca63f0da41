/// Return `$error` if `$left` not equals `$right`
#[macro_export]
macro_rules! expect_equality {
    ($left: expr, $right: expr, $error: expr) => {
        if $left != $right {
            return Err($error($left, $right));
        }
    };
}

/// Evaluates both expressions, with `rayon::join` when feature `parallel` is enabled and one after
/// the other otherwise. Returns the tuple of results.
#[cfg(feature = "parallel")]
#[macro_export]
macro_rules! join {
    ($a: expr, $b: expr) => {
        $crate::rayon::join(|| $a, || $b)
    };
}

/// Evaluates both expressions, with `rayon::join` when feature `parallel` is enabled and one after
/// the other otherwise. Returns the tuple of results.
#[cfg(not(feature = "parallel"))]
#[macro_export]
macro_rules! join {
    ($a: expr, $b: expr) => {
        ($a, $b)
    };
}

/// Return `$error` if `$value` has more than `$bits` bits (sign ignored)
#[macro_export]
macro_rules! expect_bit_length_at_most {
    ($value: expr, $bits: expr, $error: expr) => {
        if $value.bits() > $bits as u64 {
            return Err($error($value.bits(), $bits as u64));
        }
    };
}

#[cfg(test)]
mod tests {
    use num::BigInt;

    #[test]
    fn join() {
        let (a, b) = join!(1 + 1, 2 * 3);
        assert_eq!([a, b], [2, 6]);
    }

    #[test]
    fn equality() {
        enum Errr {
            #[allow(dead_code)]
            Unequal(usize, usize),
        }

        fn test_fn(s: usize) -> Result<usize, Errr> {
            let v = vec![1, 2, 4];
            expect_equality!(v.len(), s, Errr::Unequal);
            Ok(s)
        }

        assert!(test_fn(3).is_ok());
        assert!(test_fn(2).is_err());
    }

    #[test]
    fn bit_length() {
        #[derive(Debug)]
        enum Errr {
            #[allow(dead_code)]
            TooLong(u64, u64),
        }

        fn test_fn(v: &BigInt, bits: usize) -> Result<(), Errr> {
            expect_bit_length_at_most!(v, bits, Errr::TooLong);
            Ok(())
        }

        assert!(test_fn(&BigInt::from(255), 8).is_ok());
        assert!(test_fn(&BigInt::from(-255), 8).is_ok());
        assert!(test_fn(&BigInt::from(256), 8).is_err());
    }
}
