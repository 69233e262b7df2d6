pub trait PasswordHasher {
    fn hash(&self, password: &str, salt: &str) -> String;
    fn gen_salt(&self) -> String;

    fn verify(&self, password: &str, salt: &str, hashed: &str) -> bool {
        self.hash(password, salt) == hashed
    }
}
